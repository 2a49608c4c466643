#[allow(clippy::module_inception)]
pub mod configuration;

pub use configuration::*;
