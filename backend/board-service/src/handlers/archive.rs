/// Archive handler - explicit sweep trigger
use super::AppState;
use crate::error::Result;
use actix_web::{web, HttpResponse};

/// Run one archival sweep now and report what it did
pub async fn sweep(state: web::Data<AppState>) -> Result<HttpResponse> {
    let report = state.archival.sweep().await?;
    tracing::info!(archived = report.archived, "Manual archive sweep");
    Ok(HttpResponse::Ok().json(report))
}
