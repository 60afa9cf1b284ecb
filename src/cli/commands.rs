use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "td", about = concat!("taskdeck v", env!("CARGO_PKG_VERSION"), " - a task list that remembers"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Keep data in a different directory
    #[arg(short = 'D', long = "data-dir", global = true, env = "TASKDECK_HOME")]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks in the current view
    List(ViewArgs),
    /// Add a task
    Add(AddArgs),
    /// Edit a task's title, description, due date, or priority
    Edit(EditArgs),
    /// Toggle a task between done and pending
    Done(IdArg),
    /// Delete a task
    Rm(IdArg),
    /// Archive a task
    Archive(IdArg),
    /// Restore an archived task
    Unarchive(IdArg),
    /// Toggle selection on a task
    Select(IdArg),
    /// Select every visible task, or clear the selection if any is selected
    SelectAll(ViewArgs),
    /// Complete every visible selected task
    CompleteSelected(ViewArgs),
    /// Delete every visible selected task
    DeleteSelected(DeleteSelectedArgs),
    /// Move a task within the manual order
    Mv(MvArgs),
    /// Show task statistics
    Stats,
    /// Show or change the color theme
    Theme(ThemeArgs),
    /// Forget all tasks; the next run starts from the demo list
    Reset,
}

// ---------------------------------------------------------------------------
// Shared args
// ---------------------------------------------------------------------------

/// View state for commands that act on the visible list
#[derive(Args, Default)]
pub struct ViewArgs {
    /// all, completed, pending, overdue, archived
    #[arg(long)]
    pub filter: Option<String>,
    /// date, priority, status, title, manual
    #[arg(long)]
    pub sort: Option<String>,
    /// Case-insensitive text in title or description
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: u64,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Longer description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// high, medium, low
    #[arg(short, long)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: u64,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(short, long)]
    pub description: Option<String>,
    /// New due date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "no_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub no_due: bool,
    /// high, medium, low
    #[arg(short, long)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct DeleteSelectedArgs {
    #[command(flatten)]
    pub view: ViewArgs,
    /// Confirm the deletion
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct MvArgs {
    /// Current position in the list (1-based)
    pub from: usize,
    /// Target position (1-based)
    pub to: usize,
    #[command(flatten)]
    pub view: ViewArgs,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// Omit to print the current theme
    #[arg(value_enum)]
    pub action: Option<ThemeAction>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Toggle,
    Light,
    Dark,
}
