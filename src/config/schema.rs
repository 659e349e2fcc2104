use serde::{Deserialize, Serialize};

/// Default monthly revenue per user, in the configured currency
pub const DEFAULT_ARPU: f64 = 14.0;

/// Application configuration.
///
/// Every field is optional; a missing config file means all defaults.
///
/// Example YAML:
/// ```yaml
/// arpu: 14
/// currency: "£"
/// store_path: ~/rice/store.json
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Monthly revenue per user used until one is saved in the store
    #[serde(default)]
    pub arpu: Option<f64>,

    /// Currency symbol prefixed to revenue figures
    #[serde(default)]
    pub currency: Option<String>,

    /// Override for the store file (defaults to ~/.config/rice-calc/store.json)
    #[serde(default)]
    pub store_path: Option<String>,
}

impl Config {
    pub fn default_arpu(&self) -> f64 {
        self.arpu.unwrap_or(DEFAULT_ARPU)
    }

    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or("£")
    }
}
