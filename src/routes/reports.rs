// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Diary PDF report.

use crate::error::{AppError, Result};
use crate::services::report::render_diary_report;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/reports/diary/{pet_id}", get(diary_report))
}

/// Render every diary entry of a pet as an inline PDF.
async fn diary_report(
    State(state): State<Arc<AppState>>,
    Path(pet_id): Path<String>,
) -> Result<impl IntoResponse> {
    let entries = state.db.list_diary_entries(&pet_id).await?;
    if entries.is_empty() {
        return Err(AppError::NotFound(
            "No diary entries for this pet".to_string(),
        ));
    }

    let pet = state.db.get_pet(&pet_id).await?;
    let pdf = render_diary_report(pet.as_ref(), &entries, chrono::Utc::now());

    tracing::info!(
        pet_id = %pet_id,
        entries = entries.len(),
        bytes = pdf.len(),
        "Diary report generated"
    );

    let disposition = format!(
        "inline; filename=\"relatorio_diario_{}.pdf\"",
        sanitize_filename(&pet_id)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    ))
}

/// Keep the header value printable and unquoted.
fn sanitize_filename(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
