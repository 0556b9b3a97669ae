//! Test utilities for the EMT assessment engine.
//!
//! * [`ScriptedToolbox`] runs steps and protocols against a fixed answer
//!   queue, with no session or driver involved.
//! * [`Autopilot`] drives a live [`emtsim_runtime::Session`] from a script
//!   on its own task.

pub mod autopilot;
pub mod scripted;

pub use autopilot::{Autopilot, FlightLog};
pub use scripted::ScriptedToolbox;

/// Assert that a [`ScriptedToolbox`] narrated each given line, in order.
///
/// ```rust,ignore
/// assert_narrated!(tools, "STEP 4: AVPU ASSESSMENT", "➤ EMT: Starting CPR...");
/// ```
#[macro_export]
macro_rules! assert_narrated {
    ($tools:expr, $($line:expr),+ $(,)?) => {{
        let texts = $tools.texts();
        let mut cursor = texts.iter();
        $(
            let line: &str = $line;
            assert!(
                cursor.any(|t| t == line),
                "expected narration line {:?} (in order) but it was not found in {:#?}",
                line,
                texts
            );
        )+
    }};
}

/// Assert that a [`ScriptedToolbox`] never narrated `line`.
#[macro_export]
macro_rules! assert_not_narrated {
    ($tools:expr, $line:expr) => {{
        let line: &str = $line;
        assert!(
            !$tools.narrated(line),
            "narration line {:?} was not expected",
            line
        );
    }};
}
