#[allow(clippy::module_inception)]
pub mod notifications;

pub use notifications::*;
