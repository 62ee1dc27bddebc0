//! Conversion pipeline.
//!
//! Both operations are total over arbitrary text: a rule whose pattern never
//! matches leaves the document untouched, and an invalid custom pattern is
//! skipped with a diagnostic. Neither direction can fail.

use super::rules::{Rule, BACKLOG_TO_MARKDOWN, MARKDOWN_TO_BACKLOG};
use crate::settings::{ConversionSettings, SettingsPatch};
use regex::Regex;

/// Bidirectional Markdown ⇄ Backlog notation converter.
///
/// Holds the current settings and passes them through each pipeline call;
/// no rule captures settings at construction time.
#[derive(Debug, Clone, Default)]
pub struct BacklogConverter {
    settings: ConversionSettings,
}

impl BacklogConverter {
    /// Create a converter with the given settings.
    pub fn new(settings: ConversionSettings) -> Self {
        Self { settings }
    }

    /// Current settings.
    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Shallow-merge a partial update into the current settings.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.settings = self.settings.merged(patch);
    }

    /// Convert Markdown to Backlog notation.
    ///
    /// Applies the fixed forward table in declaration order, then the custom
    /// rules from the settings in list order.
    pub fn convert_to_backlog(&self, content: &str) -> String {
        let converted = apply_rules(MARKDOWN_TO_BACKLOG, content, &self.settings);
        apply_custom_rules(&converted, &self.settings)
    }

    /// Convert Backlog notation back to Markdown.
    ///
    /// Custom rules do not run in this direction.
    pub fn convert_to_markdown(&self, content: &str) -> String {
        apply_rules(BACKLOG_TO_MARKDOWN, content, &self.settings)
    }
}

/// Run a rule table in declaration order; the output of each rule is the
/// input of the next.
fn apply_rules(rules: &[Rule], content: &str, settings: &ConversionSettings) -> String {
    let mut converted = content.to_string();
    for rule in rules {
        converted = rule.apply(&converted, settings);
    }
    converted
}

/// Apply the user-defined rules, in list order, after the fixed table.
///
/// Each pattern is compiled fresh per call; a pattern that fails to compile
/// is skipped with a warning and the remaining rules still run.
fn apply_custom_rules(content: &str, settings: &ConversionSettings) -> String {
    let mut converted = content.to_string();
    for rule in &settings.custom_rules {
        match Regex::new(&rule.pattern) {
            Ok(re) => {
                converted = re
                    .replace_all(&converted, rule.replacement.as_str())
                    .into_owned();
            }
            Err(err) => {
                log::warn!("invalid custom rule pattern '{}': {}", rule.pattern, err);
            }
        }
    }
    converted
}
