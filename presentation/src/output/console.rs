//! Console output formatter for conversation reports

use super::formatter::OutputFormatter;
use super::report::ConversationReport;
use colored::Colorize;

/// Formats conversation reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format every transcript, followed by failures
    pub fn format(reports: &[ConversationReport]) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Conclave Transcripts"));
        output.push('\n');

        for report in reports {
            output.push_str(&Self::section_header(&format!(
                "Conversation {}",
                report.conversation_id
            )));
            output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), report.topic));
            output.push_str(&format!(
                "{} {}\n",
                "Agents:".cyan().bold(),
                Self::join(&report.participants)
            ));

            for message in &report.messages {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", message.agent_id).yellow().bold(),
                    Self::indent(&message.content, "  ")
                ));
            }

            if !report.failures.is_empty() {
                output.push_str(&format!("\n{}\n", "Failed turns:".red().bold()));
                for failure in &report.failures {
                    output.push_str(&format!(
                        "  x round {} {}: {}\n",
                        failure.round, failure.agent_id, failure.reason
                    ));
                }
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(reports: &[ConversationReport]) -> String {
        serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string())
    }

    /// One line per conversation
    pub fn format_summary(reports: &[ConversationReport]) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Conclave Summary ===".cyan().bold()));

        for report in reports {
            let status = if report.is_complete() {
                "ok".green()
            } else {
                "partial".yellow()
            };
            output.push_str(&format!(
                "{} {} {} rounds, {} messages, {} failed turns\n",
                status,
                report.conversation_id.to_string().bold(),
                report.rounds,
                report.messages.len(),
                report.failures.len()
            ));
        }

        output
    }

    fn join<T: ToString>(items: &[T]) -> String {
        items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, reports: &[ConversationReport]) -> String {
        Self::format(reports)
    }

    fn format_json(&self, reports: &[ConversationReport]) -> String {
        Self::format_json(reports)
    }

    fn format_summary(&self, reports: &[ConversationReport]) -> String {
        Self::format_summary(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_application::RoundOutcome;
    use conclave_domain::{AgentId, AgentProfile, Conversation, Message};

    fn report() -> ConversationReport {
        let conversation = Conversation::new(
            "c1",
            "lunch",
            vec![
                AgentProfile::new("a", "A", "hungry").unwrap(),
                AgentProfile::new("b", "B", "picky").unwrap(),
            ],
        )
        .unwrap();

        let rounds = vec![
            RoundOutcome {
                messages: vec![Message::new(
                    conversation.id().clone(),
                    AgentId::new("a"),
                    "tacos?",
                )],
                failures: vec![(AgentId::new("b"), "offline".to_string())],
            },
            RoundOutcome {
                messages: vec![Message::new(
                    conversation.id().clone(),
                    AgentId::new("a"),
                    "still tacos",
                )],
                failures: Vec::new(),
            },
        ];
        ConversationReport::new(&conversation, rounds)
    }

    #[test]
    fn test_report_flattens_rounds() {
        let report = report();
        assert_eq!(report.rounds, 2);
        assert_eq!(report.messages.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].round, 1);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_full_output_contains_transcript_and_failures() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format(&[report()]);

        assert!(output.contains("Conversation c1"));
        assert!(output.contains("Agents: a, b"));
        assert!(output.contains("  tacos?"));
        assert!(output.contains("x round 1 b: offline"));
    }

    #[test]
    fn test_summary_output() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format_summary(&[report()]);
        assert!(output.contains("partial c1 2 rounds, 2 messages, 1 failed turns"));
    }

    #[test]
    fn test_json_output_is_parseable() {
        let output = ConsoleFormatter::format_json(&[report()]);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["conversation_id"], "c1");
        assert_eq!(value[0]["messages"][1]["content"], "still tacos");
        assert_eq!(value[0]["failures"][0]["agent_id"], "b");
    }
}
