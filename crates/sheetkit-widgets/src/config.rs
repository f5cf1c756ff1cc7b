#![forbid(unsafe_code)]

//! Sheet configuration.
//!
//! [`SheetConfig`] is the validated, in-memory configuration a sheet reads.
//! [`SheetConfigFile`] is its loose on-disk mirror: every field optional,
//! values unchecked. Converting a file into a config never fails; bad values
//! degrade to defaults and each substitution is reported by
//! [`SheetConfigFile::validate`].
//!
//! # Loading
//!
//! ```toml
//! # sheet.toml
//! initial_breakpoint = 0.4
//! breakpoints = [0.2, 0.4, 0.9]
//! duration_ms = 250
//! show_backdrop = true
//! backdrop_dismiss = true
//! ```
//!
//! ```rust,ignore
//! let config = SheetConfig::from_toml_file("sheet.toml")?;
//! let config = SheetConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | `initial_breakpoint` | `0.5` |
//! | `breakpoints` | nine-point scale `0.1..=0.8, 1.0` |
//! | `duration` | 300 ms |
//! | `show_backdrop` | `false` |
//! | `backdrop_dismiss` | `false` |
//! | `handle_visible` | `true` |

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use sheetkit_core::breakpoint::{BreakpointSet, is_valid};
use web_time::Duration;

use crate::bottom_sheet::animation::DEFAULT_DURATION;

/// Initial breakpoint used when none (or an invalid one) is configured.
pub const DEFAULT_INITIAL_BREAKPOINT: f64 = 0.5;

// ---------------------------------------------------------------------------
// SheetConfig
// ---------------------------------------------------------------------------

/// Validated sheet configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfig {
    /// Breakpoint `show()` opens at.
    pub initial_breakpoint: f64,
    /// Allowed settled heights.
    pub breakpoints: BreakpointSet,
    /// Open/close transform duration.
    pub duration: Duration,
    /// Whether a backdrop is shown while open.
    pub show_backdrop: bool,
    /// Whether clicking the backdrop dismisses the sheet.
    pub backdrop_dismiss: bool,
    /// Whether the drag handle is shown (and accepts drags).
    pub handle_visible: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            initial_breakpoint: DEFAULT_INITIAL_BREAKPOINT,
            breakpoints: BreakpointSet::default(),
            duration: DEFAULT_DURATION,
            show_backdrop: false,
            backdrop_dismiss: false,
            handle_visible: true,
        }
    }
}

impl SheetConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial breakpoint; out-of-range values fall back to `0.5`.
    pub fn initial_breakpoint(mut self, fraction: f64) -> Self {
        self.initial_breakpoint = sanitize_initial_breakpoint(fraction);
        self
    }

    /// Set the breakpoint set.
    pub fn breakpoints(mut self, breakpoints: impl Into<BreakpointSet>) -> Self {
        self.breakpoints = breakpoints.into();
        self
    }

    /// Set the transform duration; zero falls back to 300 ms.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = sanitize_duration(duration);
        self
    }

    /// Set whether the backdrop is shown while open.
    pub fn show_backdrop(mut self, show: bool) -> Self {
        self.show_backdrop = show;
        self
    }

    /// Set whether a backdrop click dismisses.
    pub fn backdrop_dismiss(mut self, dismiss: bool) -> Self {
        self.backdrop_dismiss = dismiss;
        self
    }

    /// Set whether the drag handle is shown.
    pub fn handle_visible(mut self, visible: bool) -> Self {
        self.handle_visible = visible;
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, SheetConfigError> {
        let file: SheetConfigFile = toml::from_str(s).map_err(SheetConfigError::Toml)?;
        Ok(file.into_config())
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SheetConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SheetConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, SheetConfigError> {
        let file: SheetConfigFile = serde_json::from_str(s).map_err(SheetConfigError::Json)?;
        Ok(file.into_config())
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SheetConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SheetConfigError::Io)?;
        Self::from_json_str(&content)
    }
}

/// Clamp an initial breakpoint into `(0, 1]`, falling back to `0.5`.
#[must_use]
pub fn sanitize_initial_breakpoint(fraction: f64) -> f64 {
    if is_valid(fraction) {
        fraction
    } else {
        DEFAULT_INITIAL_BREAKPOINT
    }
}

/// Replace a zero duration with the 300 ms default.
#[must_use]
pub fn sanitize_duration(duration: Duration) -> Duration {
    if duration.is_zero() {
        DEFAULT_DURATION
    } else {
        duration
    }
}

// ---------------------------------------------------------------------------
// SheetConfigFile
// ---------------------------------------------------------------------------

/// Unvalidated configuration as read from TOML or JSON.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SheetConfigFile {
    pub initial_breakpoint: Option<f64>,
    pub breakpoints: Option<Vec<f64>>,
    pub duration_ms: Option<u64>,
    pub show_backdrop: Option<bool>,
    pub backdrop_dismiss: Option<bool>,
    pub handle_visible: Option<bool>,
}

impl SheetConfigFile {
    /// Describe every value that will be replaced by a default.
    ///
    /// An empty list means the file converts without substitutions.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(f) = self.initial_breakpoint
            && !is_valid(f)
        {
            problems.push(format!(
                "initial_breakpoint must be in (0, 1], got {f}; using {DEFAULT_INITIAL_BREAKPOINT}"
            ));
        }

        if let Some(values) = &self.breakpoints {
            let dropped: Vec<f64> = values.iter().copied().filter(|v| !is_valid(*v)).collect();
            if !dropped.is_empty() {
                problems.push(format!("breakpoints outside (0, 1] dropped: {dropped:?}"));
            }
            if BreakpointSet::try_new(values.iter().copied()).is_none() {
                problems.push("breakpoints has no valid member; using fallback [0.5, 1.0]".into());
            }
        }

        if self.duration_ms == Some(0) {
            problems.push(format!(
                "duration_ms must be > 0; using {}",
                DEFAULT_DURATION.as_millis()
            ));
        }

        problems
    }

    /// Convert into a validated configuration, substituting defaults.
    #[must_use]
    pub fn into_config(self) -> SheetConfig {
        for problem in self.validate() {
            tracing::warn!(%problem, "sheet config value replaced");
        }
        let defaults = SheetConfig::default();
        SheetConfig {
            initial_breakpoint: self
                .initial_breakpoint
                .map_or(defaults.initial_breakpoint, sanitize_initial_breakpoint),
            breakpoints: self
                .breakpoints
                .map_or(defaults.breakpoints, BreakpointSet::new),
            duration: self.duration_ms.map_or(defaults.duration, |ms| {
                sanitize_duration(Duration::from_millis(ms))
            }),
            show_backdrop: self.show_backdrop.unwrap_or(defaults.show_backdrop),
            backdrop_dismiss: self.backdrop_dismiss.unwrap_or(defaults.backdrop_dismiss),
            handle_visible: self.handle_visible.unwrap_or(defaults.handle_visible),
        }
    }
}

impl From<&SheetConfig> for SheetConfigFile {
    fn from(config: &SheetConfig) -> Self {
        Self {
            initial_breakpoint: Some(config.initial_breakpoint),
            breakpoints: Some(config.breakpoints.as_slice().to_vec()),
            duration_ms: Some(u64::try_from(config.duration.as_millis()).unwrap_or(u64::MAX)),
            show_backdrop: Some(config.show_backdrop),
            backdrop_dismiss: Some(config.backdrop_dismiss),
            handle_visible: Some(config.handle_visible),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading a configuration.
#[derive(Debug)]
pub enum SheetConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
}

impl std::fmt::Display for SheetConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for SheetConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SheetConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_component_defaults() {
        let c = SheetConfig::default();
        assert_eq!(c.initial_breakpoint, 0.5);
        assert_eq!(c.breakpoints, BreakpointSet::default());
        assert_eq!(c.duration, Duration::from_millis(300));
        assert!(!c.show_backdrop);
        assert!(!c.backdrop_dismiss);
        assert!(c.handle_visible);
    }

    #[test]
    fn builders_sanitize() {
        let c = SheetConfig::new()
            .initial_breakpoint(0.0)
            .duration(Duration::ZERO)
            .breakpoints(vec![0.0, 2.0]);
        assert_eq!(c.initial_breakpoint, 0.5);
        assert_eq!(c.duration, DEFAULT_DURATION);
        assert_eq!(c.breakpoints, BreakpointSet::fallback());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let file = SheetConfigFile::default();
        assert!(file.validate().is_empty());
        assert_eq!(file.into_config(), SheetConfig::default());
    }

    #[test]
    fn unset_and_invalid_breakpoints_differ() {
        let unset = SheetConfigFile::default().into_config();
        assert_eq!(unset.breakpoints, BreakpointSet::default());

        let invalid = SheetConfigFile {
            breakpoints: Some(vec![-1.0, 0.0]),
            ..Default::default()
        };
        assert_eq!(invalid.validate().len(), 2);
        assert_eq!(invalid.into_config().breakpoints, BreakpointSet::fallback());
    }

    #[test]
    fn validate_reports_each_substitution() {
        let file = SheetConfigFile {
            initial_breakpoint: Some(1.5),
            breakpoints: Some(vec![0.3, 7.0]),
            duration_ms: Some(0),
            ..Default::default()
        };
        let problems = file.validate();
        assert_eq!(problems.len(), 3, "{problems:?}");
        let config = file.into_config();
        assert_eq!(config.initial_breakpoint, 0.5);
        assert_eq!(config.breakpoints.as_slice(), &[0.3]);
        assert_eq!(config.duration, DEFAULT_DURATION);
    }

    #[test]
    fn config_roundtrips_through_file_form() {
        let config = SheetConfig::new()
            .initial_breakpoint(0.3)
            .breakpoints(vec![0.3, 0.6, 1.0])
            .duration(Duration::from_millis(450))
            .show_backdrop(true);
        let file = SheetConfigFile::from(&config);
        assert_eq!(file.into_config(), config);
    }

    #[cfg(feature = "config")]
    #[test]
    fn loads_toml() {
        let config = SheetConfig::from_toml_str(
            "initial_breakpoint = 0.4\nbreakpoints = [0.9, 0.4, 0.2]\nduration_ms = 250\nshow_backdrop = true\n",
        )
        .unwrap();
        assert_eq!(config.initial_breakpoint, 0.4);
        assert_eq!(config.breakpoints.as_slice(), &[0.2, 0.4, 0.9]);
        assert_eq!(config.duration, Duration::from_millis(250));
        assert!(config.show_backdrop);
        assert!(!config.backdrop_dismiss);
    }

    #[cfg(feature = "config")]
    #[test]
    fn loads_json_with_degraded_values() {
        let config =
            SheetConfig::from_json_str(r#"{"breakpoints": [], "initial_breakpoint": -2}"#).unwrap();
        assert_eq!(config.breakpoints, BreakpointSet::fallback());
        assert_eq!(config.initial_breakpoint, 0.5);
    }

    #[cfg(feature = "config")]
    #[test]
    fn malformed_toml_is_an_error() {
        let err = SheetConfig::from_toml_str("breakpoints = \"oops\"").unwrap_err();
        assert!(matches!(err, SheetConfigError::Toml(_)));
        assert!(err.to_string().starts_with("TOML parse error"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn missing_file_is_io_error() {
        let err = SheetConfig::from_toml_file("/nonexistent/sheet.toml").unwrap_err();
        assert!(matches!(err, SheetConfigError::Io(_)));
    }
}
