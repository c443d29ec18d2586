use chrono::Duration;

use gstdesk_client::DEFAULT_TTL_SECS;

pub const LOOKUP_TTL_ENV: &str = "GSTDESK_LOOKUP_TTL_SECS";
pub const AUTO_NUMBER_ENV: &str = "GSTDESK_AUTO_NUMBER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Freshness window for master-list lookups.
    pub lookup_ttl: Duration,
    /// Assign an invoice number on submit when none was entered.
    pub auto_number: bool,
    /// Settings that were present but invalid; defaults were used instead.
    pub ignored: Vec<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            lookup_ttl: Duration::seconds(DEFAULT_TTL_SECS),
            auto_number: true,
            ignored: Vec::new(),
        }
    }
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(LOOKUP_TTL_ENV) {
            match raw.trim().parse::<i64>() {
                Ok(secs) if secs > 0 => config.lookup_ttl = Duration::seconds(secs),
                _ => config
                    .ignored
                    .push(format!("{LOOKUP_TTL_ENV}={raw}: expected a positive number of seconds")),
            }
        }

        if let Some(raw) = lookup(AUTO_NUMBER_ENV) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => config.auto_number = true,
                "0" | "false" | "no" => config.auto_number = false,
                _ => config
                    .ignored
                    .push(format!("{AUTO_NUMBER_ENV}={raw}: expected true or false")),
            }
        }

        config
    }

    pub fn log_ignored(&self) {
        for setting in &self.ignored {
            tracing::warn!(%setting, "ignoring invalid setting; using default");
        }
    }
}
