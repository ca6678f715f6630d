use std::path::PathBuf;

use docket_core::{AggregateOptions, ExtPatterns, WarningRule};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Log level for docket output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging output
    #[serde(alias = "off")]
    Silent,
    /// Only errors
    Error,
    /// Errors and warnings
    #[serde(alias = "warning")]
    Warn,
    /// Errors, warnings, and info (default)
    #[default]
    Info,
    /// All logs including debug
    Debug,
}

impl LogLevel {
    /// Convert to tracing filter string
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter())
    }
}

fn default_namespaces() -> Vec<String> {
    vec!["Ext".to_string()]
}

/// Settings of one documentation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocketConfig {
    /// Source files and directories to document.
    pub inputs: Vec<PathBuf>,

    /// Namespaces whose `define`, `extend` and `override` calls are recognized.
    #[serde(default = "default_namespaces")]
    pub ext_namespaces: Vec<String>,

    /// Append the `eOpts` parameter to events. Unset means auto-detect from
    /// the presence of define calls.
    pub ext4_events: Option<bool>,

    /// Warning rules such as `+nodoc`, `-all` or `type_name:/vendor/`.
    pub warnings: Vec<String>,

    /// Fail the run when any warning was reported.
    pub warnings_as_errors: bool,

    pub log_level: LogLevel,

    /// Validate type expressions against the known classes.
    pub check_types: bool,
}

impl Default for DocketConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            ext_namespaces: default_namespaces(),
            ext4_events: None,
            warnings: Vec::new(),
            warnings_as_errors: false,
            log_level: LogLevel::default(),
            check_types: false,
        }
    }
}

impl DocketConfig {
    /// Create a config from a JSON value.
    ///
    /// # Example
    ///
    /// ```
    /// use docket_config::DocketConfig;
    /// use serde_json::json;
    ///
    /// let config = DocketConfig::from_value(json!({
    ///     "inputs": ["src"],
    ///     "warnings": ["-nodoc"]
    /// }))
    /// .unwrap();
    /// assert_eq!(config.ext_namespaces, vec!["Ext"]);
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        let config: DocketConfig =
            serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
                field: "config".to_string(),
                hint: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: e.to_string(),
        })
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.ext_namespaces.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ext_namespaces".to_string(),
                hint: "at least one namespace is required".to_string(),
            });
        }
        if let Some(bad) = self
            .ext_namespaces
            .iter()
            .find(|ns| ns.is_empty() || ns.split('.').any(str::is_empty))
        {
            return Err(ConfigError::InvalidValue {
                field: "ext_namespaces".to_string(),
                hint: format!("'{}' is not a dotted namespace", bad),
            });
        }
        self.warning_rules().map(|_| ())
    }

    /// Parsed warning rules, in the order they apply. Each entry may hold a
    /// comma separated list.
    pub fn warning_rules(&self) -> Result<Vec<WarningRule>> {
        let mut rules = Vec::new();
        for entry in &self.warnings {
            let parsed = WarningRule::parse_list(entry)
                .map_err(|source| ConfigError::InvalidWarningRule { source })?;
            rules.extend(parsed);
        }
        Ok(rules)
    }

    pub fn ext_patterns(&self) -> ExtPatterns {
        ExtPatterns::new(self.ext_namespaces.iter().cloned())
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            ext4_events: self.ext4_events,
            check_types: self.check_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_core::WarningKind;
    use serde_json::json;

    #[test]
    fn defaults_recognize_ext() {
        let config = DocketConfig::default();
        assert_eq!(config.ext_namespaces, vec!["Ext"]);
        assert_eq!(config.ext4_events, None);
        assert!(config.ext_patterns().is_define("Ext.define"));
    }

    #[test]
    fn from_value_fills_missing_fields() {
        let config = DocketConfig::from_value(json!({
            "inputs": ["lib/app.js"],
            "ext4_events": false,
            "log_level": "debug"
        }))
        .unwrap();
        assert_eq!(config.inputs, vec![PathBuf::from("lib/app.js")]);
        assert_eq!(config.ext4_events, Some(false));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.ext_namespaces, vec!["Ext"]);
        assert!(!config.check_types);
    }

    #[test]
    fn warning_entries_may_hold_lists() {
        let config = DocketConfig {
            warnings: vec!["-all".to_string(), "+nodoc, +tag:/src/".to_string()],
            ..DocketConfig::default()
        };
        let rules = config.warning_rules().unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].kind, None);
        assert!(!rules[0].enabled);
        assert_eq!(rules[2].kind, Some(WarningKind::Tag));
        assert_eq!(rules[2].path.as_deref(), Some("/src/"));
    }

    #[test]
    fn bad_warning_rule_is_rejected() {
        let err = DocketConfig::from_value(json!({ "warnings": ["+bogus"] })).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWarningRule { .. }));
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let err = DocketConfig::from_value(json!({ "ext_namespaces": ["My..Ns"] })).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn wrong_field_type_is_invalid_value() {
        let err = DocketConfig::from_value(json!({ "check_types": "yes" })).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn log_level_parses_aliases() {
        assert_eq!("off".parse::<LogLevel>(), Ok(LogLevel::Silent));
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }

    #[test]
    fn to_value_round_trips_settings() {
        let config = DocketConfig {
            check_types: true,
            ..DocketConfig::default()
        };
        let value = config.to_value().unwrap();
        assert_eq!(value["check_types"], json!(true));
        assert_eq!(value["log_level"], json!("info"));
    }
}
