//! Statistics collection and reporting
//!
//! [`StatsReporter`] counts hash evaluations and submission outcomes sent
//! over channels by the searches, and periodically logs them together with
//! host CPU and memory usage.

/// Statistics reporter implementation
pub mod reporter;

pub use reporter::{HardwareStats, MiningStats, ShareResult, StatsReporter};
