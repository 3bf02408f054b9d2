//! Introspection configuration.

/// Environment variable read by [`IntrospectConfig::from_env`].
pub const DEBUG_ENV_VAR: &str = "SQLRECORD_DEBUG";

/// Configuration for an [`Introspector`](crate::introspect::Introspector).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntrospectConfig {
    /// Emit `debug` events for excluded fields, offset skips, and encoded
    /// composites.
    pub debug: bool,
}

impl IntrospectConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable debug events.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Build a configuration from `SQLRECORD_DEBUG`.
    ///
    /// `1`, `true`, `yes` and `on` (any case) enable debug events; anything
    /// else, including an unset variable, leaves them off.
    pub fn from_env() -> Self {
        let debug = std::env::var(DEBUG_ENV_VAR)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        Self { debug }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
