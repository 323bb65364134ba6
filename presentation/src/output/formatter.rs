//! Output formatter trait

use super::report::ConversationReport;

/// Trait for formatting conversation reports
pub trait OutputFormatter {
    /// Format every message of every conversation
    fn format(&self, reports: &[ConversationReport]) -> String;

    /// Format as JSON
    fn format_json(&self, reports: &[ConversationReport]) -> String;

    /// Format counts and failures only
    fn format_summary(&self, reports: &[ConversationReport]) -> String;
}
