//! Progress reporting for turn scheduling

use colored::Colorize;
use conclave_application::TurnProgressNotifier;
use conclave_domain::{AgentId, ConversationId};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;

/// Reports progress with one bar per conversation
///
/// A bar's length grows as turns are queued and advances as they finish,
/// so it tracks the conversation's backlog rather than a fixed total.
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<ConversationId, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn conversation_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, conversation_id: &ConversationId, f: impl FnOnce(&ProgressBar)) {
        let mut bars = self.bars.lock().unwrap_or_else(|e| e.into_inner());
        let bar = bars.entry(conversation_id.clone()).or_insert_with(|| {
            let pb = self.multi.add(ProgressBar::new(0));
            pb.set_style(Self::conversation_style());
            pb.set_prefix(conversation_id.to_string());
            pb
        });
        f(bar);
    }

    /// Mark every bar finished
    pub fn finish(&self) {
        let bars = self.bars.lock().unwrap_or_else(|e| e.into_inner());
        for bar in bars.values() {
            bar.finish_with_message("done".green().to_string());
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for ProgressReporter {
    fn on_turn_queued(&self, conversation_id: &ConversationId, _agent_id: &AgentId, _position: usize) {
        self.with_bar(conversation_id, |pb| pb.inc_length(1));
    }

    fn on_turn_started(&self, conversation_id: &ConversationId, agent_id: &AgentId) {
        self.with_bar(conversation_id, |pb| {
            pb.set_message(format!("{} speaking...", agent_id));
        });
    }

    fn on_turn_finished(&self, conversation_id: &ConversationId, agent_id: &AgentId, success: bool) {
        self.with_bar(conversation_id, |pb| {
            let status = if success {
                format!("{} {}", "v".green(), agent_id)
            } else {
                format!("{} {}", "x".red(), agent_id)
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl TurnProgressNotifier for SimpleProgress {
    fn on_turn_queued(&self, conversation_id: &ConversationId, agent_id: &AgentId, position: usize) {
        if position > 0 {
            println!(
                "{} {} {} waits behind {} turn(s)",
                "->".cyan(),
                conversation_id.to_string().bold(),
                agent_id,
                position
            );
        }
    }

    fn on_turn_finished(&self, conversation_id: &ConversationId, agent_id: &AgentId, success: bool) {
        if success {
            println!("  {} {} {}", "v".green(), conversation_id, agent_id);
        } else {
            println!("  {} {} {} (failed)", "x".red(), conversation_id, agent_id);
        }
    }
}
