pub mod client;
pub mod endpoint;
pub mod envelope;

pub use client::MetricsClient;
pub use endpoint::{Endpoint, StatsMetric};
pub use envelope::decode_envelope;
