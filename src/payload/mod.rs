#[allow(clippy::module_inception)]
pub mod payload;

pub use payload::*;
