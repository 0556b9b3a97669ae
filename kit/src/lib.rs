//! EMT primary assessment engine facade crate.
//!
//! Re-exports the core model, the async runtime and (with the default `std`
//! feature) the built-in protocols behind a single entry point.
//!
//! ```rust,ignore
//! use emtsim::prelude::*;
//!
//! let session = Session::new(EngineConfig::default())?;
//! let report = Orchestrator::new(standard_catalog()).run(&session).await?;
//! ```

pub use emtsim_core as core;
pub use emtsim_runtime as runtime;
#[cfg(feature = "std")]
pub use emtsim_std as std;

pub use emtsim_core::{PatientAction, PatientRecord, Protocol, Step, StepOutcome, Toolbox};
pub use emtsim_runtime::{EngineConfig, Orchestrator, RunOutcome, RunReport, Session};

pub mod prelude {
    pub use emtsim_core::prelude::*;
    pub use emtsim_runtime::prelude::*;
    #[cfg(feature = "std")]
    pub use emtsim_std::prelude::*;
}
