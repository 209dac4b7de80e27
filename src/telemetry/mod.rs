pub mod http;
pub mod init;
pub mod metrics;

pub use init::{TelemetryGuard, init_telemetry};
pub use metrics::*;
