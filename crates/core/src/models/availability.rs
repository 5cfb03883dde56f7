use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// Members flagged as unavailable for one queried window.
///
/// Advisory only: it never blocks creating or joining a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySignal {
    pub session_id: String,
    pub window: Interval,
    pub unavailable: Vec<String>,
}

impl AvailabilitySignal {
    pub fn is_empty(&self) -> bool {
        self.unavailable.is_empty()
    }
}
