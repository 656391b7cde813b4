//! Configuration validation issues.
//!
//! Loaders report problems as structured [`ConfigIssue`]s instead of failing
//! on the first one, so every problem in a config file can be shown at once.
//! Issues of [`Severity::Error`] abort startup.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A `[[models]]` entry has no model id.
    EmptyModelId,
    /// A `[[models]]` entry has no agent.
    EmptyAgent { model: String },
    /// Two `[[models]]` entries share an id.
    DuplicateModel { model: String },
    /// `server.default_model` is not in the routing table.
    UnknownDefaultModel { model: String },
    /// `server.port` is zero.
    InvalidPort,
    /// A timeout is zero seconds.
    ZeroTimeout { field: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_severity() {
        let error = ConfigIssue::error(ConfigIssueCode::InvalidPort, "port is 0");
        assert!(error.is_error());
        let warning = ConfigIssue::warning(
            ConfigIssueCode::ZeroTimeout {
                field: "session.timeout_secs".to_string(),
            },
            "timeout is 0",
        );
        assert!(!warning.is_error());
        assert_eq!(warning.message, "timeout is 0");
    }
}
