//! Response bodies shared by several handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Acknowledgement returned by delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    /// Identifier of the removed resource.
    #[schema(minimum = 1)]
    pub id: i64,
    #[schema(example = "mission deleted")]
    pub message: String,
}

impl DeletedResponse {
    pub fn new(id: impl Into<i64>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
        }
    }
}
