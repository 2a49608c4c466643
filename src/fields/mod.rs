#[allow(clippy::module_inception)]
pub mod fields;

pub use fields::*;
