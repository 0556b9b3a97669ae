use emtsim_core::error::ProtocolError;
use emtsim_core::message::PendingInput;
use emtsim_runtime::session::{Session, SessionState};
use std::collections::VecDeque;
use tokio::task::JoinHandle;

/// What an [`Autopilot`] did while driving a session.
#[derive(Debug, Clone, Default)]
pub struct FlightLog {
    /// Each accepted answer with the request it resolved.
    pub answered: Vec<(PendingInput, String)>,
    /// Answers the session refused.
    pub rejected: Vec<String>,
    pub continues: usize,
    /// State that ended the drive.
    pub final_state: Option<SessionState>,
}

impl FlightLog {
    pub fn prompts(&self) -> Vec<&str> {
        self.answered.iter().map(|(req, _)| req.prompt.as_str()).collect()
    }
}

/// Drives a live [`Session`] from a script, the way an operator would.
///
/// Continue requests are always proceeded. A rejected answer is logged and
/// the next scripted answer is tried against the same request. When the
/// script runs out while an answer is pending, the session is abandoned.
pub struct Autopilot {
    script: VecDeque<String>,
}

impl Autopilot {
    pub fn new<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: script.into_iter().map(Into::into).collect(),
        }
    }

    pub fn spawn(self, session: Session) -> JoinHandle<FlightLog> {
        tokio::spawn(self.fly(session))
    }

    pub async fn fly(mut self, session: Session) -> FlightLog {
        let mut log = FlightLog::default();

        while let Some(state) = session.next_request().await {
            match state {
                SessionState::AwaitingInput(request) => {
                    let Some(answer) = self.script.pop_front() else {
                        tracing::debug!(prompt = %request.prompt, "Script exhausted; abandoning");
                        session.abandon();
                        continue;
                    };
                    match session.answer(answer.clone()) {
                        Ok(()) => log.answered.push((request, answer)),
                        Err(ProtocolError::InvalidOption { token, .. }) => log.rejected.push(token),
                        Err(err) => {
                            tracing::debug!(error = %err, "Answer failed");
                            log.final_state = Some(session.state());
                            break;
                        }
                    }
                }
                SessionState::AwaitingContinue => {
                    if session.proceed().is_ok() {
                        log.continues += 1;
                    }
                }
                other => {
                    log.final_state = Some(other);
                    break;
                }
            }
        }
        log
    }
}
