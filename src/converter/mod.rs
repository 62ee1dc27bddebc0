//! Markdown to Backlog notation converter module
//!
//! This module provides the bidirectional conversion engine:
//! - forward: Markdown to Backlog wiki notation
//! - reverse: Backlog wiki notation back to Markdown
//!
//! Both directions are ordered pipelines of regex rewrite rules applied over
//! the whole document string. The forward pipeline additionally runs the
//! user-defined custom rules from the settings.

mod engine;
mod indent;
mod rules;

pub use engine::BacklogConverter;
