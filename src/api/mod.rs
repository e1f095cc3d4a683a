//! Thin HTTP wrapper around the chapterizer: upload a PDF or text file, get chapters back.

mod error;

pub use error::ApiError;

use crate::models::{Chapter, ChaptersResponse, UploadResponse};
use crate::services::chapterizer::Chapterizer;
use crate::services::pdf;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    response::Html,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct AppState {
    chapterizer: Arc<Chapterizer>,
    max_upload_bytes: usize,
}

impl AppState {
    pub fn new(chapterizer: Chapterizer, max_upload_bytes: usize) -> Self {
        AppState {
            chapterizer: Arc::new(chapterizer),
            max_upload_bytes,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/upload", post(upload_file))
        .route("/chapterize", post(chapterize_text))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(AllowMethods::any())
                .allow_headers(AllowHeaders::any()),
        )
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Chapterize</title>
    <meta charset="utf-8">
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; }
        .endpoint { background-color: #f5f5f5; padding: 10px; margin: 10px 0; border-radius: 4px; font-family: monospace; }
    </style>
</head>
<body>
    <h1>Chapterize</h1>
    <p>Splits the text of a PDF or plain-text book into titled, paragraphed chapters.</p>

    <h2>Endpoints</h2>
    <div class="endpoint">GET /health - Health check</div>
    <div class="endpoint">POST /upload - multipart form, file in the field "file"</div>
    <div class="endpoint">POST /chapterize - raw UTF-8 text as the request body</div>
</body>
</html>
"#,
    )
}

async fn health_check() -> &'static str {
    "OK"
}

async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let span = tracing::info_span!("upload", request_id = %Uuid::new_v4());

    async move {
        let (file_name, data) = read_file_field(&mut multipart).await?;
        tracing::info!(file_name = %file_name, bytes = data.len(), "received upload");

        let chapterizer = Arc::clone(&state.chapterizer);
        let name = file_name.clone();
        let (chapters, total_pages) = tokio::task::spawn_blocking(move || {
            let extracted = pdf::extract_text(&name, &data)?;
            let chapters = chapterizer.extract(&extracted.text);
            Ok::<_, ApiError>((chapters, extracted.total_pages))
        })
        .await??;

        tracing::info!(chapters = chapters.len(), total_pages, "upload chapterized");
        Ok(Json(UploadResponse {
            success: true,
            chapters,
            total_pages,
            file_name,
        }))
    }
    .instrument(span)
    .await
}

async fn chapterize_text(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChaptersResponse>, ApiError> {
    let text = pdf::decode_text(&body)?;
    let chapterizer = Arc::clone(&state.chapterizer);
    let chapters: Vec<Chapter> =
        tokio::task::spawn_blocking(move || chapterizer.extract(&text)).await?;

    Ok(Json(ChaptersResponse {
        success: true,
        chapters,
    }))
}

/// Takes the field named `file`, or failing that the first field that carries a filename.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) && field.file_name().is_none() {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let data = field.bytes().await?;
        return Ok((file_name, data));
    }

    Err(ApiError::MissingFile)
}
