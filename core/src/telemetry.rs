//! # Telemetry: Observability Decorators
//!
//! [`Traced`] wraps any [`Step`] in a tracing span and logs how it finished.
//! [`crate::protocol::Protocol::then`] applies it to every stage.

use crate::metadata::StepMetadata;
use crate::outcome::StepOutcome;
use crate::step::{Step, StepResult};
use crate::toolbox::Toolbox;
use async_trait::async_trait;
use tracing::{Instrument, info_span};

pub struct Traced<S> {
    inner: S,
}

impl<S: Step> Traced<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: Step> Step for Traced<S> {
    fn metadata(&self) -> StepMetadata {
        self.inner.metadata()
    }

    async fn execute(&self, tools: &dyn Toolbox) -> StepResult {
        let meta = self.inner.metadata();
        let span = info_span!(
            "Step",
            emtsim.step = %meta.number,
            emtsim.label = %meta.label
        );

        async move {
            tracing::debug!("Entering step");
            let start = std::time::Instant::now();

            let result = self.inner.execute(tools).await;

            let duration = start.elapsed();
            match &result {
                Ok(StepOutcome::Next) => {
                    tracing::info!(?duration, "Step completed: Next");
                }
                Ok(StepOutcome::Placeholder { branch }) => {
                    tracing::warn!(%branch, ?duration, "Step reached unbuilt branch");
                }
                Ok(StepOutcome::Deceased) => {
                    tracing::warn!(?duration, "Step completed: patient deceased");
                }
                Err(e) => {
                    tracing::error!(error = %e, ?duration, "Step failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }
}
