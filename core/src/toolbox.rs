//! # Toolbox
//!
//! The only dependency a step receives. It bundles four capabilities:
//!
//! * [`NarrationChannel`] - ordered, typed text output
//! * [`InputGate`] - suspend until one of a closed set of options is chosen
//! * [`ContinuationGate`] - suspend until the operator says "proceed"
//! * [`RecordAccess`] - read the committed record, dispatch actions
//!
//! Anything implementing all four is a [`Toolbox`]: a live session, a
//! scripted test harness, a terminal driver.

use crate::action::PatientAction;
use crate::error::{ProtocolError, RecordError};
use crate::message::MessageKind;
use crate::protocol::Phase;
use crate::record::PatientRecord;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait NarrationChannel: Send + Sync {
    /// Append a message. Returns once it is stored and observers are notified.
    ///
    /// `delay` is a pacing hint for the presentation layer only.
    async fn narrate(&self, text: &str, kind: MessageKind, delay: Duration);

    async fn header(&self, text: &str) {
        self.styled(MessageKind::Header, text).await
    }

    async fn system(&self, text: &str) {
        self.styled(MessageKind::System, text).await
    }

    async fn emt(&self, text: &str) {
        self.styled(MessageKind::Emt, text).await
    }

    async fn critical(&self, text: &str) {
        self.styled(MessageKind::Critical, text).await
    }

    async fn dim(&self, text: &str) {
        self.styled(MessageKind::Dim, text).await
    }

    /// Unprefixed SYSTEM line.
    async fn note(&self, text: &str) {
        self.narrate(text, MessageKind::System, MessageKind::System.delay_hint())
            .await
    }

    /// Narrate with the kind's standard prefix and pacing hint.
    async fn styled(&self, kind: MessageKind, text: &str) {
        let line = format!("{}{}", kind.prefix(), text);
        self.narrate(&line, kind, kind.delay_hint()).await
    }
}

#[async_trait]
pub trait InputGate: Send + Sync {
    /// Suspend until an external actor picks one of `options`.
    async fn ask(&self, prompt: &str, options: &[&str]) -> Result<String, ProtocolError>;
}

#[async_trait]
pub trait ContinuationGate: Send + Sync {
    /// Suspend until an external actor signals "proceed".
    async fn pause(&self) -> Result<(), ProtocolError>;
}

pub trait RecordAccess: Send + Sync {
    /// Fresh copy of the committed record. Call at the point of use.
    fn patient(&self) -> PatientRecord;

    fn dispatch(&self, action: PatientAction) -> Result<(), RecordError>;

    /// Every action committed since the last reset, in order.
    fn journal(&self) -> Vec<PatientAction>;
}

/// Everything a step may touch.
pub trait Toolbox: NarrationChannel + InputGate + ContinuationGate + RecordAccess {
    /// Claim the toolbox for a new run. Refused with
    /// [`ProtocolError::NotIdle`] while a run is active or a finished run
    /// has not been reset.
    fn begin_run(&self) -> Result<(), ProtocolError> {
        Ok(())
    }

    /// Called by the orchestrator on every phase change.
    fn enter_phase(&self, _phase: Phase) {}

    /// The run ended with an engine fault. Must leave the toolbox in a
    /// terminal state from which a reset is possible.
    fn fail_run(&self, _error: &ProtocolError) {}
}
