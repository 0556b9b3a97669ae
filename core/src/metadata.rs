use serde::{Deserialize, Serialize};

/// Static description of a step, used for tracing and protocol outlines.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StepMetadata {
    /// Protocol position, e.g. `"4"` or `"9b"`.
    pub number: String,
    pub label: String,
    pub description: Option<String>,
    /// Record fields the step reads.
    pub reads: Vec<String>,
    /// Record fields the step may write.
    pub writes: Vec<String>,
}

impl StepMetadata {
    pub fn new(number: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn reads(mut self, fields: &[&str]) -> Self {
        self.reads = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn writes(mut self, fields: &[&str]) -> Self {
        self.writes = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}
