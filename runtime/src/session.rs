//! # Session
//!
//! The interactive [`Toolbox`] implementation. A session owns the record
//! store, the narration log and the single pending-request slot. Steps
//! suspend by parking a request in the slot; a driver resolves it with
//! exactly one explicit call ([`Session::answer`] or [`Session::proceed`]).
//!
//! ```rust,ignore
//! let session = Session::new(EngineConfig::instant())?;
//! let run = tokio::spawn({
//!     let session = session.clone();
//!     async move { orchestrator.run(&session).await }
//! });
//!
//! while let Some(state) = session.next_request().await {
//!     match state {
//!         SessionState::AwaitingInput(input) => session.answer(&input.options[0])?,
//!         SessionState::AwaitingContinue => session.proceed()?,
//!         _ => break,
//!     }
//! }
//! ```

use crate::config::{ConfigError, EngineConfig, InputPolicy};
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
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, oneshot, watch};
use uuid::Uuid;

/// What the session is doing, as seen by a driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// Created or reset; no run in progress.
    Idle,
    Running,
    AwaitingInput(PendingInput),
    AwaitingContinue,
    Complete,
    /// The driver gave up; record and narration are intact.
    Abandoned,
}

impl SessionState {
    /// `true` when a driver has something to do or nothing more will happen.
    pub fn needs_driver(&self) -> bool {
        !matches!(self, SessionState::Idle | SessionState::Running)
    }

    pub fn is_suspended(&self) -> bool {
        matches!(
            self,
            SessionState::AwaitingInput(_) | SessionState::AwaitingContinue
        )
    }
}

enum PendingRequest {
    Input {
        input: PendingInput,
        reply: oneshot::Sender<String>,
    },
    Continue {
        reply: oneshot::Sender<()>,
    },
}

impl PendingRequest {
    fn kind(&self) -> RequestKind {
        match self {
            PendingRequest::Input { .. } => RequestKind::Input,
            PendingRequest::Continue { .. } => RequestKind::Continue,
        }
    }
}

/// The pending request and the abandoned flag share one lock; every state
/// transition is published while it is held.
#[derive(Default)]
struct Slot {
    request: Option<PendingRequest>,
    abandoned: bool,
}

struct Inner {
    id: Uuid,
    config: EngineConfig,
    store: RecordStore,
    log: NarrationLog,
    slot: Mutex<Slot>,
    phase: Mutex<Phase>,
    state: watch::Sender<SessionState>,
}

/// Shared handle to one patient run. Cloning shares the session.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let (state, _rx) = watch::channel(SessionState::Idle);
        let log = NarrationLog::new(config.event_capacity);
        Ok(Self {
            inner: Arc::new(Inner {
                id: Uuid::new_v4(),
                config,
                store: RecordStore::new(),
                log,
                slot: Mutex::new(Slot::default()),
                phase: Mutex::new(Phase::AwaitingCallType),
                state,
            }),
        })
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn phase(&self) -> Phase {
        *self.inner.phase.lock()
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Narration history so far.
    pub fn messages(&self) -> Vec<Message> {
        self.inner.log.messages()
    }

    /// Live narration feed.
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.inner.log.subscribe()
    }

    /// Wait until the session needs a driver: a pending request, completion
    /// or abandonment. Returns `None` if the session was dropped.
    pub async fn next_request(&self) -> Option<SessionState> {
        let mut rx = self.inner.state.subscribe();
        rx.wait_for(SessionState::needs_driver)
            .await
            .ok()
            .map(|state| state.clone())
    }

    /// Resolve the pending input request with `token`.
    pub fn answer(&self, token: impl Into<String>) -> Result<(), ProtocolError> {
        let token = token.into();
        let mut slot = self.inner.slot.lock();
        match slot.request.take() {
            None => Err(ProtocolError::NoPendingRequest),
            Some(request @ PendingRequest::Continue { .. }) => {
                slot.request = Some(request);
                Err(ProtocolError::WrongRequestKind {
                    expected: RequestKind::Continue,
                })
            }
            Some(PendingRequest::Input { input, reply }) => {
                if self.inner.config.input_policy == InputPolicy::Strict && !input.accepts(&token) {
                    tracing::warn!(%token, prompt = %input.prompt, "Answer rejected: not an offered option");
                    let options = input.options.clone();
                    slot.request = Some(PendingRequest::Input { input, reply });
                    return Err(ProtocolError::InvalidOption { token, options });
                }
                self.inner.state.send_replace(SessionState::Running);
                reply
                    .send(token)
                    .map_err(|_| ProtocolError::Abandoned(RequestKind::Input))
            }
        }
    }

    /// Resolve the pending continue request.
    pub fn proceed(&self) -> Result<(), ProtocolError> {
        let mut slot = self.inner.slot.lock();
        match slot.request.take() {
            None => Err(ProtocolError::NoPendingRequest),
            Some(request @ PendingRequest::Input { .. }) => {
                slot.request = Some(request);
                Err(ProtocolError::WrongRequestKind {
                    expected: RequestKind::Input,
                })
            }
            Some(PendingRequest::Continue { reply }) => {
                self.inner.state.send_replace(SessionState::Running);
                reply
                    .send(())
                    .map_err(|_| ProtocolError::Abandoned(RequestKind::Continue))
            }
        }
    }

    /// Give up on the run. The suspended gate call returns
    /// [`ProtocolError::Abandoned`]; later gate calls fail the same way.
    pub fn abandon(&self) {
        let mut slot = self.inner.slot.lock();
        slot.abandoned = true;
        if let Some(request) = slot.request.take() {
            tracing::info!(pending = %request.kind(), "Abandoning session with a pending request");
        }
        self.inner.state.send_replace(SessionState::Abandoned);
    }

    /// Recreate the default record and clear narration.
    ///
    /// Allowed only when no run is in progress.
    pub fn reset(&self) -> Result<(), ProtocolError> {
        let mut slot = self.inner.slot.lock();
        let state = self.state();
        if matches!(state, SessionState::Running) || state.is_suspended() {
            return Err(ProtocolError::SessionBusy);
        }
        self.inner.store.dispatch(PatientAction::Reset)?;
        self.inner.log.clear();
        *self.inner.phase.lock() = Phase::AwaitingCallType;
        slot.abandoned = false;
        self.inner.state.send_replace(SessionState::Idle);
        tracing::info!(session = %self.inner.id, "Session reset");
        Ok(())
    }

    fn park(&self, request: PendingRequest, state: SessionState) -> Result<(), ProtocolError> {
        let kind = request.kind();
        let mut slot = self.inner.slot.lock();
        if slot.abandoned {
            return Err(ProtocolError::Abandoned(kind));
        }
        if slot.request.is_some() {
            return Err(ProtocolError::RequestAlreadyPending);
        }
        slot.request = Some(request);
        // Publish only after the request is parked so a driver that sees the
        // state can always resolve it.
        self.inner.state.send_replace(state);
        tracing::debug!(pending = %kind, "Gate suspended");
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.inner.id)
            .field("phase", &self.phase())
            .field("state", &self.state())
            .finish()
    }
}

#[async_trait]
impl NarrationChannel for Session {
    async fn narrate(&self, text: &str, kind: MessageKind, delay: Duration) {
        if let Some(wait) = self.inner.config.pace(delay) {
            tokio::time::sleep(wait).await;
        }
        self.inner.log.append(text, kind);
    }
}

#[async_trait]
impl InputGate for Session {
    async fn ask(&self, prompt: &str, options: &[&str]) -> Result<String, ProtocolError> {
        if options.is_empty() {
            return Err(ProtocolError::EmptyOptions {
                prompt: prompt.to_string(),
            });
        }
        let input = PendingInput::new(prompt, options);
        let (reply, rx) = oneshot::channel();
        self.park(
            PendingRequest::Input {
                input: input.clone(),
                reply,
            },
            SessionState::AwaitingInput(input),
        )?;

        let value = rx
            .await
            .map_err(|_| ProtocolError::Abandoned(RequestKind::Input))?;
        self.styled(MessageKind::Input, &value).await;
        Ok(value)
    }
}

#[async_trait]
impl ContinuationGate for Session {
    async fn pause(&self) -> Result<(), ProtocolError> {
        let (reply, rx) = oneshot::channel();
        self.park(
            PendingRequest::Continue { reply },
            SessionState::AwaitingContinue,
        )?;
        rx.await
            .map_err(|_| ProtocolError::Abandoned(RequestKind::Continue))
    }
}

impl RecordAccess for Session {
    fn patient(&self) -> PatientRecord {
        self.inner.store.current()
    }

    fn dispatch(&self, action: PatientAction) -> Result<(), RecordError> {
        self.inner.store.dispatch(action)
    }

    fn journal(&self) -> Vec<PatientAction> {
        self.inner.store.journal()
    }
}

impl Toolbox for Session {
    fn begin_run(&self) -> Result<(), ProtocolError> {
        let slot = self.inner.slot.lock();
        if slot.abandoned || self.state() != SessionState::Idle {
            return Err(ProtocolError::NotIdle);
        }
        self.inner.state.send_replace(SessionState::Running);
        Ok(())
    }

    fn enter_phase(&self, phase: Phase) {
        let slot = self.inner.slot.lock();
        *self.inner.phase.lock() = phase;
        let state = match phase {
            Phase::Complete => SessionState::Complete,
            _ => SessionState::Running,
        };
        if !slot.abandoned {
            self.inner.state.send_replace(state);
        }
        tracing::debug!(%phase, "Phase changed");
    }

    fn fail_run(&self, error: &ProtocolError) {
        let mut slot = self.inner.slot.lock();
        if !slot.abandoned {
            tracing::warn!(%error, session = %self.inner.id, "Run failed; session abandoned");
        }
        slot.abandoned = true;
        slot.request = None;
        self.inner.state.send_replace(SessionState::Abandoned);
    }
}
