use std::error::Error;

use chrono::NaiveDate;
use serde::Serialize;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::storage::Storage;
use crate::io::store::FileStore;
use crate::model::task::{Priority, TaskId};
use crate::model::theme::Theme;
use crate::model::toast::Toast;
use crate::model::view::{Filter, SortKey};
use crate::ops::stats;
use crate::ops::task_ops::{self, TaskDraft, TaskEdit, TaskError};
use crate::session::Session;

type CmdResult = Result<(), Box<dyn Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let dir = config_io::data_dir(cli.data_dir.as_deref());
    let config = config_io::read_config(&dir)?;
    tracing::debug!(dir = %dir.display(), "opening task store");
    let mut session = Session::open(Storage::new(FileStore::new(&dir)), &config);

    match cli.command {
        // Read commands
        Commands::List(view) => cmd_list(&mut session, &view, json)?,
        Commands::Stats => cmd_stats(&session, json)?,
        Commands::Theme(args) => cmd_theme(&mut session, args, json)?,

        // Single-task writes
        Commands::Add(args) => cmd_add(&mut session, args, json)?,
        Commands::Edit(args) => cmd_edit(&mut session, args, json)?,
        Commands::Done(IdArg { id }) => {
            let changed = require(session.toggle_complete(id), id)?;
            report(&session, changed, Some(id), json)?;
        }
        Commands::Rm(IdArg { id }) => {
            let changed = require(session.delete_task(id), id)?;
            report(&session, changed, Some(id), json)?;
        }
        Commands::Archive(IdArg { id }) => {
            let changed = require(session.archive(id), id)?;
            report(&session, changed, Some(id), json)?;
        }
        Commands::Unarchive(IdArg { id }) => {
            let changed = require(session.unarchive(id), id)?;
            report(&session, changed, Some(id), json)?;
        }
        Commands::Select(IdArg { id }) => {
            let changed = require(session.toggle_selection(id), id)?;
            report(&session, changed, Some(id), json)?;
        }

        // Bulk writes over the visible list
        Commands::SelectAll(view) => {
            apply_view(&mut session, &view)?;
            let changed = session.toggle_select_all();
            if !json {
                let n = session.engine().selected_count(session.tasks());
                println!("{} selected", n);
            }
            report(&session, changed, None, json)?;
        }
        Commands::CompleteSelected(view) => {
            apply_view(&mut session, &view)?;
            let n = session.bulk_complete();
            if n == 0 && !json {
                println!("nothing selected");
            }
            report(&session, n > 0, None, json)?;
        }
        Commands::DeleteSelected(args) => cmd_delete_selected(&mut session, args, json)?,
        Commands::Mv(args) => cmd_mv(&mut session, args, json)?,

        Commands::Reset => {
            session.reset();
            if !json {
                println!("all tasks cleared");
            }
            report(&session, true, None, json)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Turn a "nothing happened" from a by-id action into a not-found error
fn require(changed: bool, id: TaskId) -> Result<bool, TaskError> {
    if changed { Ok(true) } else { Err(TaskError::NotFound(id)) }
}

fn apply_view(session: &mut Session, view: &ViewArgs) -> CmdResult {
    let engine = session.engine_mut();
    if let Some(ref f) = view.filter {
        let filter = Filter::parse_filter(f).ok_or_else(|| format!("unknown filter: {}", f))?;
        engine.set_filter(filter);
    }
    if let Some(ref s) = view.sort {
        let sort = SortKey::parse_sort(s).ok_or_else(|| format!("unknown sort: {}", s))?;
        engine.set_sort(sort);
    }
    if let Some(ref q) = view.search {
        engine.set_search(q.as_str());
    }
    Ok(())
}

fn parse_due(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid due date '{}' (expected YYYY-MM-DD): {}", s, e))
}

fn parse_priority_arg(s: &str) -> Result<Priority, String> {
    Priority::parse_priority(s).ok_or_else(|| format!("unknown priority: {}", s))
}

#[derive(Serialize)]
struct WriteJson<'a> {
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<TaskId>,
    toasts: &'a [Toast],
}

/// Print the toasts a command produced (or the JSON result for writes)
fn report(session: &Session, changed: bool, id: Option<TaskId>, json: bool) -> CmdResult {
    let toasts = session.toasts().toasts();
    if json {
        let out = WriteJson { changed, id, toasts };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for toast in toasts {
            println!("{}", format_toast(toast));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(session: &mut Session, view: &ViewArgs, json: bool) -> CmdResult {
    apply_view(session, view)?;
    let today = session.engine().today();
    let visible = session.visible();
    let counts = session.counts();

    if json {
        let out = list_to_json(&visible, counts, session.toasts().toasts(), today);
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", format_counts(&counts));
    if visible.is_empty() {
        println!("(no tasks)");
    }
    for (i, task) in visible.iter().enumerate() {
        println!("{}", format_task_line(i + 1, task, today));
    }
    Ok(())
}

fn cmd_stats(session: &Session, json: bool) -> CmdResult {
    let today = session.engine().today();
    let tasks = session.tasks();
    let out = StatsJson {
        counts: stats::count_tasks(tasks, today),
        status: stats::status_breakdown(tasks, today),
        priority: stats::priority_breakdown(tasks),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_stats(&out) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_theme(session: &mut Session, args: ThemeArgs, json: bool) -> CmdResult {
    let theme = match args.action {
        None => session.theme().current(),
        Some(ThemeAction::Toggle) => session.toggle_theme(),
        Some(ThemeAction::Light) => {
            session.set_theme(Theme::Light);
            Theme::Light
        }
        Some(ThemeAction::Dark) => {
            session.set_theme(Theme::Dark);
            Theme::Dark
        }
    };
    if json {
        println!("{}", serde_json::json!({ "theme": theme }));
    } else {
        println!("{}", theme);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(session: &mut Session, args: AddArgs, json: bool) -> CmdResult {
    let mut draft = TaskDraft::new(args.title);
    if let Some(d) = args.description {
        draft.description = d;
    }
    if let Some(ref due) = args.due {
        draft.due_date = Some(task_ops::local_midnight(parse_due(due)?));
    }
    if let Some(ref p) = args.priority {
        draft.priority = parse_priority_arg(p)?;
    }
    let id = session.add_task(draft)?;
    if !json {
        println!("{}", id);
    }
    report(session, true, Some(id), json)
}

fn cmd_edit(session: &mut Session, args: EditArgs, json: bool) -> CmdResult {
    let task = task_ops::find_task(session.tasks(), args.id).ok_or(TaskError::NotFound(args.id))?;
    let mut edit = TaskEdit::from_task(task);
    if let Some(title) = args.title {
        edit.title = title;
    }
    if let Some(description) = args.description {
        edit.description = description;
    }
    if args.no_due {
        edit.due_date = None;
    } else if let Some(ref due) = args.due {
        edit.due_date = Some(task_ops::local_midnight(parse_due(due)?));
    }
    if let Some(ref p) = args.priority {
        edit.priority = parse_priority_arg(p)?;
    }
    let changed = session.edit_task(args.id, &edit)?;
    report(session, changed, Some(args.id), json)
}

fn cmd_delete_selected(session: &mut Session, args: DeleteSelectedArgs, json: bool) -> CmdResult {
    apply_view(session, &args.view)?;
    if !session.request_bulk_delete() {
        if !json {
            println!("nothing selected");
        }
        return report(session, false, None, json);
    }
    if !args.yes {
        let n = session.engine().selected_count(session.tasks());
        session.cancel_bulk_delete();
        return Err(format!("{} selected task(s) would be deleted; rerun with --yes", n).into());
    }
    let n = session.confirm_bulk_delete();
    report(session, n > 0, None, json)
}

fn cmd_mv(session: &mut Session, args: MvArgs, json: bool) -> CmdResult {
    apply_view(session, &args.view)?;
    if !session.engine().can_reorder() {
        return Err("tasks can only be moved under manual sort".into());
    }
    let len = session.visible().len();
    for pos in [args.from, args.to] {
        if pos == 0 || pos > len {
            return Err(format!("position {} out of range (1-{})", pos, len).into());
        }
    }
    let changed = session.reorder(args.from - 1, args.to - 1);
    if !json {
        println!("moved {} to {}", args.from, args.to);
    }
    report(session, changed, None, json)
}
