//! Terminal styling for keys, values, and timestamps.

use owo_colors::OwoColorize;

/// Colors applied to command output when enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Style {
    color: bool,
}

impl Style {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn key(&self, s: &str) -> String {
        if self.color {
            s.red().bold().to_string()
        } else {
            s.to_string()
        }
    }

    pub fn value(&self, s: &str) -> String {
        if self.color {
            s.bright_blue().bold().to_string()
        } else {
            s.to_string()
        }
    }

    pub fn stamp(&self, s: &str) -> String {
        if self.color {
            s.green().to_string()
        } else {
            s.to_string()
        }
    }

    /// `key=value`, as printed by `items` and `entry`.
    pub fn pair(&self, key: &str, value: &str) -> String {
        format!("{}={}", self.key(key), self.value(value))
    }
}
