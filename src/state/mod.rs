pub mod observe;
pub mod theme;
pub mod toast;
