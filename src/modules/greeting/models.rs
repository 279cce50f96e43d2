use serde::{Deserialize, Serialize};

/// Response payload for the greeting endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Greeting {
    /// Monotonically increasing id, unique for the lifetime of the process
    pub id: u64,
    /// Greeting text reflecting book availability or a degradation notice
    pub content: String,
}
