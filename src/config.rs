//! Stopwatch configuration
//!
//! Every option is optional. [`StopwatchConfig::resolve`] turns the options a
//! caller supplied into the fixed [`Settings`] a stopwatch runs with.

use serde::{Deserialize, Serialize};

/// Message used when neither a name nor a message is given.
pub const DEFAULT_MSG: &str = "Took {:.3f}s";

/// Message used when only a name is given.
pub const DEFAULT_NAMED_MSG: &str = "{name} took {:.3f}s";

/// Message used in boundary mode, whatever else was configured.
pub const BOUNDARY_FINISHED_MSG: &str = "Finished {name} in {:.3f}s";

/// Glyph printed after the boundary "starting" notice.
pub const BOUNDARY_MARKER: &str = "⏳";

/// Options a stopwatch can be created with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopwatchConfig {
    /// Label substituted for `{name}`.
    pub name: Option<String>,

    /// Message template printed when the region ends.
    pub msg: Option<String>,

    /// Whether to print the message. Defaults to printing only when a name
    /// or message was given.
    pub print: Option<bool>,

    /// Print a "Starting" notice on entry and a "Finished" notice on exit.
    pub print_boundaries: bool,
}

impl StopwatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn print(mut self, print: bool) -> Self {
        self.print = Some(print);
        self
    }

    pub fn print_boundaries(mut self, print_boundaries: bool) -> Self {
        self.print_boundaries = print_boundaries;
        self
    }

    /// Fill in defaults. The message template is chosen here and never again.
    pub fn resolve(self) -> Settings {
        let Self {
            name,
            msg,
            print,
            print_boundaries,
        } = self;

        let should_print = print.unwrap_or(msg.is_some() || name.is_some());

        let msg = if print_boundaries {
            BOUNDARY_FINISHED_MSG.to_owned()
        } else {
            let fallback = if name.is_some() {
                DEFAULT_NAMED_MSG
            } else {
                DEFAULT_MSG
            };
            msg.unwrap_or_else(|| fallback.to_owned())
        };

        Settings {
            name,
            msg,
            should_print,
            print_boundaries,
        }
    }
}

/// Resolved, immutable stopwatch settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    name: Option<String>,
    msg: String,
    should_print: bool,
    print_boundaries: bool,
}

impl Settings {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn should_print(&self) -> bool {
        self.should_print
    }

    pub fn print_boundaries(&self) -> bool {
        self.print_boundaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_silent() {
        let settings = StopwatchConfig::default().resolve();
        assert!(!settings.should_print());
        assert!(!settings.print_boundaries());
        assert_eq!(settings.name(), None);
        assert_eq!(settings.msg(), DEFAULT_MSG);
    }

    #[test]
    fn test_name_enables_printing() {
        let settings = StopwatchConfig::new().name("Test").resolve();
        assert!(settings.should_print());
        assert_eq!(settings.name(), Some("Test"));
        assert_eq!(settings.msg(), DEFAULT_NAMED_MSG);
    }

    #[test]
    fn test_msg_enables_printing() {
        let settings = StopwatchConfig::new().msg("thingy {:.6f} s").resolve();
        assert!(settings.should_print());
        assert_eq!(settings.msg(), "thingy {:.6f} s");
    }

    #[test]
    fn test_explicit_print_wins() {
        let settings = StopwatchConfig::new().name("MyTest").print(false).resolve();
        assert!(!settings.should_print());
        assert_eq!(settings.msg(), DEFAULT_NAMED_MSG);

        let settings = StopwatchConfig::new().print(true).resolve();
        assert!(settings.should_print());
        assert_eq!(settings.msg(), DEFAULT_MSG);
    }

    #[test]
    fn test_boundaries_override_msg() {
        let settings = StopwatchConfig::new()
            .name("Test")
            .msg("{name} and {:.2f} s")
            .print_boundaries(true)
            .resolve();
        assert_eq!(settings.msg(), BOUNDARY_FINISHED_MSG);
        assert!(settings.should_print());

        // Boundary mode alone does not turn printing on.
        let settings = StopwatchConfig::new().print_boundaries(true).resolve();
        assert_eq!(settings.msg(), BOUNDARY_FINISHED_MSG);
        assert!(!settings.should_print());
    }

    #[test]
    fn test_config_deserializes_with_missing_fields() {
        let config: StopwatchConfig =
            serde_json::from_str(r#"{"name": "Load", "print_boundaries": true}"#).unwrap();
        assert_eq!(
            config,
            StopwatchConfig::new().name("Load").print_boundaries(true)
        );

        let json = serde_json::to_string(&config).unwrap();
        let back: StopwatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
