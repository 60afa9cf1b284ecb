use serde::{Deserialize, Serialize};

use crate::model::view::{Filter, SortKey};

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub toasts: ToastConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastConfig {
    /// Lifetime of a toast posted without an explicit duration. 0 = sticky.
    #[serde(default = "default_toast_duration_ms")]
    pub duration_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        ToastConfig {
            duration_ms: default_toast_duration_ms(),
        }
    }
}

fn default_toast_duration_ms() -> u64 {
    3000
}

/// Initial view state for a fresh session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub sort: SortKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.toasts.duration_ms, 3000);
        assert_eq!(config.view.filter, Filter::All);
        assert_eq!(config.view.sort, SortKey::Manual);
    }

    #[test]
    fn partial_sections_fill_in() {
        let config: Config = toml::from_str(
            r#"
[toasts]
duration_ms = 0

[view]
sort = "priority"
"#,
        )
        .unwrap();
        assert_eq!(config.toasts.duration_ms, 0);
        assert_eq!(config.view.filter, Filter::All);
        assert_eq!(config.view.sort, SortKey::Priority);
    }
}
