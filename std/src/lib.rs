//! Standard protocol library: the trauma assessment steps, the medical
//! stand-in, and the catalog that maps call classifications to them.

pub mod prelude;
pub mod protocols;
pub mod steps;

pub use protocols::{medical_protocol, standard_catalog, trauma_protocol};
