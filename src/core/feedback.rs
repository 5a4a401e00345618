//! Outbound notifications to actors.

use crate::core::output::severity_tag;
use crate::core::time::feedback_envelope;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Alert,
    Announcement,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "Info",
            Severity::Alert => "Alert",
            Severity::Announcement => "Announcement",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    pub actor: String,
    pub text: String,
    pub severity: Severity,
}

pub trait FeedbackChannel: Send + Sync {
    fn send(&self, actor: &str, text: &str, severity: Severity);
}

/// Keeps every message in memory. Used by tests and by hosts that batch
/// outbound chat.
#[derive(Debug, Default)]
pub struct FeedbackLog {
    messages: Mutex<Vec<FeedbackMessage>>,
}

impl FeedbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<FeedbackMessage> {
        self.lock().clone()
    }

    pub fn drain(&self) -> Vec<FeedbackMessage> {
        self.lock().drain(..).collect()
    }

    pub fn with_severity(&self, severity: Severity) -> Vec<FeedbackMessage> {
        self.lock()
            .iter()
            .filter(|m| m.severity == severity)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<FeedbackMessage>> {
        // A poisoned log still holds valid messages.
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FeedbackChannel for FeedbackLog {
    fn send(&self, actor: &str, text: &str, severity: Severity) {
        self.lock().push(FeedbackMessage {
            actor: actor.to_string(),
            text: text.to_string(),
            severity,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleFormat {
    Text,
    Json,
}

/// Prints feedback to stdout for the operator console.
#[derive(Debug)]
pub struct ConsoleFeedback {
    format: ConsoleFormat,
}

impl ConsoleFeedback {
    pub fn new(format: ConsoleFormat) -> Self {
        Self { format }
    }
}

impl FeedbackChannel for ConsoleFeedback {
    fn send(&self, actor: &str, text: &str, severity: Severity) {
        use colored::Colorize;

        match self.format {
            ConsoleFormat::Json => {
                let env = feedback_envelope(actor, &severity.to_string(), text);
                println!("{}", env);
            }
            ConsoleFormat::Text => {
                let tag = severity_tag(&severity.to_string());
                let tag = match severity {
                    Severity::Info => tag.bright_white(),
                    Severity::Alert => tag.bright_red().bold(),
                    Severity::Announcement => tag.bright_cyan().bold(),
                };
                println!("{} {} {}", tag, format!("@{}", actor).dimmed(), text);
            }
        }
    }
}
