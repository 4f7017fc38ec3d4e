use axum::Json;
use serde::Serialize;

use promptcraft_core::platform::{Platform, PlatformKind};

use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct PlatformInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: PlatformKind,
}

/// GET /api/v1/platforms
pub async fn list_platforms() -> Json<DataResponse<Vec<PlatformInfo>>> {
    let data = Platform::ALL
        .into_iter()
        .map(|p| PlatformInfo {
            id: p.id(),
            label: p.label(),
            kind: p.kind(),
        })
        .collect();

    Json(DataResponse { data })
}
