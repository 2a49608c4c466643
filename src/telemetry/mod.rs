#[allow(clippy::module_inception)]
pub mod telemetry;

pub use telemetry::*;
