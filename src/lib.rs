pub mod configuration;
pub mod fields;
pub mod notifications;
pub mod payload;
pub mod relay;
pub mod telemetry;
pub mod traits;
