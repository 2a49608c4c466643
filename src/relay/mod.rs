#[allow(clippy::module_inception)]
pub mod relay;

pub use relay::*;
