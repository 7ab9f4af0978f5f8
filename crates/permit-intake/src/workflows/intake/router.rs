use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::document::RenderFormat;
use super::service::IntakeService;
use super::sink::TaskSink;
use super::submission::RawSubmission;

/// HTTP surface over the intake pipeline.
pub fn intake_router<S>(service: Arc<IntakeService<S>>) -> Router
where
    S: TaskSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/permit/applications",
            post(submit_handler::<S>).fallback(method_not_allowed),
        )
        .route(
            "/api/v1/permit/preview",
            post(preview_handler::<S>).fallback(method_not_allowed),
        )
        .route(
            "/api/v1/permit/fields",
            post(fields_handler::<S>).fallback(method_not_allowed),
        )
        .with_state(service)
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({
        "success": false,
        "error": message.into(),
    });
    (status, Json(payload)).into_response()
}

async fn method_not_allowed() -> Response {
    failure(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<IntakeService<S>>>,
    payload: Result<Json<RawSubmission>, JsonRejection>,
) -> Response
where
    S: TaskSink + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match service.submit(&submission, Utc::now()).await {
        Ok(receipt) => {
            let payload = json!({
                "success": true,
                "taskId": receipt.task_id,
                "taskUrl": receipt.task_url,
                "attachmentUploaded": receipt.attachment_uploaded,
                "message": "Application submitted successfully",
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "application submission failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PreviewQuery {
    format: Option<String>,
}

pub(crate) async fn preview_handler<S>(
    State(service): State<Arc<IntakeService<S>>>,
    Query(query): Query<PreviewQuery>,
    payload: Result<Json<RawSubmission>, JsonRejection>,
) -> Response
where
    S: TaskSink + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let format = match query.format.as_deref().map(str::parse::<RenderFormat>) {
        None => RenderFormat::Pdf,
        Some(Ok(format)) => format,
        Some(Err(err)) => return failure(StatusCode::BAD_REQUEST, err.to_string()),
    };

    match service.render(&submission, Utc::now().date_naive(), format) {
        Ok(artifact) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, artifact.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    inline_disposition(&artifact.filename),
                ),
            ],
            artifact.bytes,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "document preview failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// `inline; filename="..."` with anything outside visible ASCII, quotes and backslashes
/// replaced by `_`.
fn inline_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("inline; filename=\"{safe}\"")
}

pub(crate) async fn fields_handler<S>(
    State(service): State<Arc<IntakeService<S>>>,
    payload: Result<Json<RawSubmission>, JsonRejection>,
) -> Response
where
    S: TaskSink + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let mapped = service.map(&submission, Utc::now());
    let payload = json!({
        "success": true,
        "name": service.task_title(&submission),
        "customFields": mapped.fields,
        "notes": mapped.summary,
        "priority": mapped.priority.key(),
        "status": mapped.status.key(),
        "totalNewJobs": mapped.total_new_jobs,
        "daysUntilOccupancy": mapped.days_until_occupancy,
    });
    (StatusCode::OK, Json(payload)).into_response()
}
