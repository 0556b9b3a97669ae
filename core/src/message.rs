use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Presentation category of a narration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    System,
    Emt,
    Critical,
    Dim,
    Header,
    Input,
}

impl MessageKind {
    /// Line prefix added by the convenience narrators.
    pub fn prefix(&self) -> &'static str {
        match self {
            MessageKind::System => "⚕ SYSTEM: ",
            MessageKind::Emt => "➤ EMT: ",
            MessageKind::Critical => "⚠ CRITICAL: ",
            MessageKind::Input => "> ",
            MessageKind::Dim | MessageKind::Header => "",
        }
    }

    /// Pacing hint used by the convenience narrators.
    pub fn delay_hint(&self) -> Duration {
        match self {
            MessageKind::Header => Duration::from_millis(400),
            MessageKind::System | MessageKind::Emt | MessageKind::Critical => {
                Duration::from_millis(200)
            }
            MessageKind::Dim => Duration::from_millis(100),
            MessageKind::Input => Duration::ZERO,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MessageKind::System => "SYSTEM",
            MessageKind::Emt => "EMT",
            MessageKind::Critical => "CRITICAL",
            MessageKind::Dim => "DIM",
            MessageKind::Header => "HEADER",
            MessageKind::Input => "INPUT",
        };
        f.write_str(s)
    }
}

/// One immutable narration unit. `id` is monotonic within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub kind: MessageKind,
}

/// Prompt and options of a suspended input request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInput {
    pub prompt: String,
    pub options: Vec<String>,
}

impl PendingInput {
    pub fn new(prompt: &str, options: &[&str]) -> Self {
        Self {
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn accepts(&self, token: &str) -> bool {
        self.options.iter().any(|o| o == token)
    }
}
