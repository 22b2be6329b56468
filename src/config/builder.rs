//! Default configuration file creation.
//!
//! The file is assembled with a small builder so that comments line up in one column.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::constants::*;

/// Write a commented default configuration to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, default_config_content())
        .with_context(|| format!("Failed to write default config to {}", path.display()))
}

pub(crate) fn default_config_content() -> String {
    ConfigBuilder::new()
        .add_section("Schedule")
        .add_setting(
            "mode",
            &format!("\"{DEFAULT_MODE}\""),
            "Select: \"manual\" or \"geo\"",
        )
        .add_setting(
            "update_interval",
            &DEFAULT_UPDATE_INTERVAL.to_string(),
            &format!(
                "Maximum seconds between re-evaluations ({MINIMUM_UPDATE_INTERVAL}-{MAXIMUM_UPDATE_INTERVAL})"
            ),
        )
        .add_section("Manual times")
        .add_setting(
            "sunrise",
            &format!("\"{DEFAULT_SUNRISE}\""),
            "Local time of sunrise (HH:MM:SS)",
        )
        .add_setting(
            "sunset",
            &format!("\"{DEFAULT_SUNSET}\""),
            "Local time of sunset (HH:MM:SS)",
        )
        .add_section("Geolocation")
        .add_comment("latitude = 40.7128       # Geographic latitude (-90 to 90)")
        .add_comment("longitude = -74.0060     # Geographic longitude (-180 to 180)")
        .build()
}

struct ConfigBuilder {
    entries: Vec<Entry>,
}

enum Entry {
    Section(String),
    Setting { line: String, comment: String },
    Comment(String),
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(Entry::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(Entry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    /// Add a commented-out line, e.g. an optional setting.
    fn add_comment(mut self, text: &str) -> Self {
        self.entries.push(Entry::Comment(format!("# {text}")));
        self
    }

    fn build(self) -> String {
        // One space between the longest setting and its comment
        let width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Setting { line, .. } => Some(line.len()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut lines = Vec::new();
        for entry in self.entries {
            match entry {
                Entry::Section(title) => {
                    if !lines.is_empty() {
                        lines.push(String::new());
                    }
                    lines.push(title);
                }
                Entry::Setting { line, comment } => {
                    lines.push(format!("{line:<width$}{comment}"));
                }
                Entry::Comment(text) => lines.push(text),
            }
        }

        let mut content = lines.join("\n");
        content.push('\n');
        content
    }
}
