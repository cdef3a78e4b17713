//! Shared response envelope types for API handlers.
//!
//! Every successful body is `{ "data": ... }`. Use [`DataResponse`] instead of
//! ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: videos }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
