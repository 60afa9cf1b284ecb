pub mod config;
pub mod task;
pub mod theme;
pub mod toast;
pub mod view;

pub use config::*;
pub use task::*;
pub use theme::*;
pub use toast::*;
pub use view::*;
