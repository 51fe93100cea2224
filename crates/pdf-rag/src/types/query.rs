//! Query request types

use serde::{Deserialize, Serialize};

/// Query string of `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskQuery {
    /// The question to answer
    pub question: String,
}
