pub mod api;
pub mod error;
pub mod feedback;
pub mod refresh;
pub mod scorecard;

#[cfg(test)]
mod fake;

pub use api::{ApiClient, AthleticsApi};
pub use error::{ClientError, Result};
pub use feedback::{Feedback, LiveFeedback};
pub use refresh::{CriticalCollections, Refresh, RefreshPoller, Snapshot};
pub use scorecard::{Scorecard, SharedApi};
