use std::future::Future;

use mime::Mime;
use serde::Serialize;

use super::fields::NormalizedFieldSet;

/// Everything the sink needs to open one task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDraft {
    pub name: String,
    pub notes: String,
    pub custom_fields: NormalizedFieldSet,
    /// Raw occupancy date, forwarded untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedTask {
    pub id: String,
    /// Permalink reported by the sink, when it sends one.
    pub permalink: Option<String>,
}

/// Rendered document ready for upload.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content_type: Mime,
    pub bytes: Vec<u8>,
}

/// External task tracker receiving normalized submissions.
pub trait TaskSink: Send + Sync {
    fn create_task(
        &self,
        draft: &TaskDraft,
    ) -> impl Future<Output = Result<CreatedTask, SinkError>> + Send;

    fn attach(
        &self,
        task: &CreatedTask,
        attachment: Attachment,
    ) -> impl Future<Output = Result<(), SinkError>> + Send;

    /// Browser URL for a task the sink did not give a permalink for.
    fn task_url(&self, task: &CreatedTask) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("sink transport failed: {0}")]
    Transport(String),
    #[error("sink rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("unexpected sink response: {0}")]
    Malformed(String),
}
