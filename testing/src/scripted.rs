use async_trait::async_trait;
use emtsim_core::action::PatientAction;
use emtsim_core::error::{ProtocolError, RecordError, RequestKind};
use emtsim_core::message::{Message, MessageKind, PendingInput};
use emtsim_core::narration::NarrationLog;
use emtsim_core::protocol::Phase;
use emtsim_core::record::PatientRecord;
use emtsim_core::store::RecordStore;
use emtsim_core::toolbox::{ContinuationGate, InputGate, NarrationChannel, RecordAccess, Toolbox};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

/// Deterministic [`Toolbox`] for step and protocol tests.
///
/// Answers come from a queue; continue requests resolve immediately. Every
/// prompt, pause, narration line and post-dispatch record is kept for
/// inspection. Running out of answers behaves like an abandoned session.
pub struct ScriptedToolbox {
    store: RecordStore,
    log: NarrationLog,
    strict: bool,
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<PendingInput>>,
    pauses: Mutex<usize>,
    snapshots: Mutex<Vec<PatientRecord>>,
    phases: Mutex<Vec<Phase>>,
    delays: Mutex<Vec<Duration>>,
}

impl ScriptedToolbox {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            store: RecordStore::new(),
            log: NarrationLog::default(),
            strict: true,
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
            pauses: Mutex::new(0),
            snapshots: Mutex::new(Vec::new()),
            phases: Mutex::new(Vec::new()),
            delays: Mutex::new(Vec::new()),
        }
    }

    /// Forward answers that are not among the offered options.
    pub fn pass_through(mut self) -> Self {
        self.strict = false;
        self
    }

    /// Commit `actions` before the test starts. Seeded actions are not
    /// recorded as snapshots.
    pub fn seeded(self, actions: impl IntoIterator<Item = PatientAction>) -> Result<Self, RecordError> {
        for action in actions {
            self.store.dispatch(action)?;
        }
        Ok(self)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.log.messages()
    }

    pub fn texts(&self) -> Vec<String> {
        self.log.messages().into_iter().map(|m| m.text).collect()
    }

    /// `true` if some narration line equals `text` exactly.
    pub fn narrated(&self, text: &str) -> bool {
        self.log.messages().iter().any(|m| m.text == text)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().iter().map(|p| p.prompt.clone()).collect()
    }

    pub fn requests(&self) -> Vec<PendingInput> {
        self.prompts.lock().clone()
    }

    pub fn pause_count(&self) -> usize {
        *self.pauses.lock()
    }

    /// Record state after each dispatch, in order.
    pub fn snapshots(&self) -> Vec<PatientRecord> {
        self.snapshots.lock().clone()
    }

    pub fn phases(&self) -> Vec<Phase> {
        self.phases.lock().clone()
    }

    /// Pacing hint of each narrated line, parallel to [`Self::messages`].
    pub fn delay_hints(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.lock().len()
    }
}

#[async_trait]
impl NarrationChannel for ScriptedToolbox {
    async fn narrate(&self, text: &str, kind: MessageKind, delay: Duration) {
        self.log.append(text, kind);
        self.delays.lock().push(delay);
    }
}

#[async_trait]
impl InputGate for ScriptedToolbox {
    async fn ask(&self, prompt: &str, options: &[&str]) -> Result<String, ProtocolError> {
        if options.is_empty() {
            return Err(ProtocolError::EmptyOptions {
                prompt: prompt.to_string(),
            });
        }
        let request = PendingInput::new(prompt, options);
        self.prompts.lock().push(request.clone());

        let answer = self
            .answers
            .lock()
            .pop_front()
            .ok_or(ProtocolError::Abandoned(RequestKind::Input))?;
        if self.strict && !request.accepts(&answer) {
            return Err(ProtocolError::InvalidOption {
                token: answer,
                options: request.options,
            });
        }
        self.styled(MessageKind::Input, &answer).await;
        Ok(answer)
    }
}

#[async_trait]
impl ContinuationGate for ScriptedToolbox {
    async fn pause(&self) -> Result<(), ProtocolError> {
        *self.pauses.lock() += 1;
        Ok(())
    }
}

impl RecordAccess for ScriptedToolbox {
    fn patient(&self) -> PatientRecord {
        self.store.current()
    }

    fn dispatch(&self, action: PatientAction) -> Result<(), RecordError> {
        self.store.dispatch(action)?;
        self.snapshots.lock().push(self.store.current());
        Ok(())
    }

    fn journal(&self) -> Vec<PatientAction> {
        self.store.journal()
    }
}

impl Toolbox for ScriptedToolbox {
    /// One run per toolbox; build a fresh one for the next script.
    fn begin_run(&self) -> Result<(), ProtocolError> {
        if self.phases.lock().is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::NotIdle)
        }
    }

    fn enter_phase(&self, phase: Phase) {
        self.phases.lock().push(phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_are_consumed_in_order_and_echoed() {
        let tools = ScriptedToolbox::new(["TRAUMA", "GSW"]);
        assert_eq!(tools.ask("call?", &["MEDICAL", "TRAUMA"]).await.unwrap(), "TRAUMA");
        assert_eq!(tools.ask("trauma?", &["GSW"]).await.unwrap(), "GSW");
        assert_eq!(tools.prompts(), vec!["call?", "trauma?"]);
        assert_eq!(tools.texts(), vec!["> TRAUMA", "> GSW"]);
    }

    #[tokio::test]
    async fn exhausted_script_reads_as_abandoned() {
        let tools = ScriptedToolbox::new(Vec::<String>::new());
        let err = tools.ask("anything?", &["YES"]).await.unwrap_err();
        assert!(matches!(err, ProtocolError::Abandoned(RequestKind::Input)));
    }

    #[test]
    fn only_one_run_per_toolbox() {
        let tools = ScriptedToolbox::new(Vec::<String>::new());
        tools.begin_run().unwrap();
        tools.enter_phase(Phase::AwaitingCallType);
        assert!(matches!(tools.begin_run(), Err(ProtocolError::NotIdle)));
    }

    #[tokio::test]
    async fn strict_mode_rejects_unoffered_answer() {
        let tools = ScriptedToolbox::new(["MAYBE"]);
        let err = tools.ask("pelvis stable?", &["YES", "NO"]).await.unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidOption { .. }));

        let lenient = ScriptedToolbox::new(["MAYBE"]).pass_through();
        assert_eq!(lenient.ask("pelvis stable?", &["YES", "NO"]).await.unwrap(), "MAYBE");
    }

    #[test]
    fn snapshots_follow_each_dispatch_but_not_seeds() {
        let tools = ScriptedToolbox::new(Vec::<String>::new())
            .seeded([PatientAction::SetShock(true)])
            .unwrap();
        tools.dispatch(PatientAction::intervention("OPA inserted")).unwrap();

        let snapshots = tools.snapshots();
        assert_eq!(snapshots.len(), 1);
        assert!(snapshots[0].is_in_shock);
        assert!(snapshots[0].has_intervention("OPA inserted"));
        assert_eq!(tools.journal().len(), 2);
    }
}
