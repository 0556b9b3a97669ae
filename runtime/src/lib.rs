pub mod config;
pub mod orchestrator;
pub mod session;
pub mod summary;

pub mod prelude {
    pub use crate::config::{EngineConfig, HaltPolicy, InputPolicy};
    pub use crate::orchestrator::{Orchestrator, RunOutcome, RunReport};
    pub use crate::session::{Session, SessionState};
}

pub use config::{ConfigError, EngineConfig, HaltPolicy, InputPolicy};
pub use orchestrator::{Orchestrator, RunOutcome, RunReport};
pub use session::{Session, SessionState};
pub use summary::narrate_summary;
