use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use mime::Mime;
use serde::Serialize;
use tracing::{info, warn};

use super::document::{DocumentBackend, DocumentRenderer, RenderError, RenderFormat};
use super::format::NOT_PROVIDED;
use super::mapper::{FieldMapper, MappedSubmission};
use super::sink::{Attachment, SinkError, TaskDraft, TaskSink};
use super::submission::{keys, RawSubmission};
use crate::config::DEFAULT_APPLICATION_LABEL;

/// Encoded document plus the name and type it is delivered under.
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    pub filename: String,
    pub content_type: Mime,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub task_id: String,
    pub task_url: String,
    pub attachment_uploaded: bool,
}

/// Runs one submission through the mapper, the renderer and the sink.
pub struct IntakeService<S> {
    mapper: FieldMapper,
    renderer: DocumentRenderer,
    backend: Arc<dyn DocumentBackend>,
    sink: Arc<S>,
    label: String,
}

impl<S> IntakeService<S>
where
    S: TaskSink + 'static,
{
    pub fn new(mapper: FieldMapper, renderer: DocumentRenderer, sink: Arc<S>) -> Self {
        Self {
            mapper,
            renderer,
            backend: Arc::from(RenderFormat::Pdf.backend()),
            sink,
            label: DEFAULT_APPLICATION_LABEL.to_string(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Backend used for the sink attachment.
    pub fn with_format(mut self, format: RenderFormat) -> Self {
        self.backend = Arc::from(format.backend());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn map(&self, submission: &RawSubmission, now: DateTime<Utc>) -> MappedSubmission {
        self.mapper.map(submission, now)
    }

    /// Lays out and encodes the document in `format` without contacting the sink.
    pub fn render(
        &self,
        submission: &RawSubmission,
        today: NaiveDate,
        format: RenderFormat,
    ) -> Result<RenderedArtifact, IntakeError> {
        self.render_with(submission, today, format.backend().as_ref())
    }

    fn render_with(
        &self,
        submission: &RawSubmission,
        today: NaiveDate,
        backend: &dyn DocumentBackend,
    ) -> Result<RenderedArtifact, IntakeError> {
        let document = self.renderer.render(submission, today);
        let bytes = backend.encode(&document)?;
        Ok(RenderedArtifact {
            filename: attachment_filename(&self.label, submission, backend.extension()),
            content_type: backend.content_type(),
            bytes,
            page_count: document.page_count(),
        })
    }

    pub fn task_title(&self, submission: &RawSubmission) -> String {
        let company = submission
            .text(keys::COMPANY_NAME)
            .unwrap_or(NOT_PROVIDED);
        format!("{} - {}", self.label, company)
    }

    /// Renders before touching the sink, so a render failure never creates a task. A failed
    /// upload is logged and reported in the receipt; the task itself still stands.
    pub async fn submit(
        &self,
        submission: &RawSubmission,
        now: DateTime<Utc>,
    ) -> Result<SubmissionReceipt, IntakeError> {
        let artifact = self.render_with(submission, now.date_naive(), self.backend.as_ref())?;
        info!(
            bytes = artifact.bytes.len(),
            pages = artifact.page_count,
            filename = %artifact.filename,
            "application document rendered"
        );

        let mapped = self.mapper.map(submission, now);
        info!(
            fields = mapped.fields.len(),
            priority = mapped.priority.key(),
            "custom fields mapped"
        );

        let draft = TaskDraft {
            name: self.task_title(submission),
            notes: mapped.summary,
            custom_fields: mapped.fields,
            due_on: submission.text(keys::OCCUPANCY_DATE).map(str::to_string),
        };
        let task = self.sink.create_task(&draft).await?;
        info!(task_id = %task.id, "sink task created");

        let attachment = Attachment {
            filename: artifact.filename,
            content_type: artifact.content_type,
            bytes: artifact.bytes,
        };
        let attachment_uploaded = match self.sink.attach(&task, attachment).await {
            Ok(()) => {
                info!(task_id = %task.id, "application document attached");
                true
            }
            Err(err) => {
                warn!(task_id = %task.id, error = %err, "attachment upload failed; continuing without it");
                false
            }
        };

        let task_url = task
            .permalink
            .clone()
            .unwrap_or_else(|| self.sink.task_url(&task));

        Ok(SubmissionReceipt {
            task_id: task.id,
            task_url,
            attachment_uploaded,
        })
    }
}

/// `<label>_<company>.<ext>` with whitespace runs collapsed to underscores.
pub fn attachment_filename(label: &str, submission: &RawSubmission, extension: &str) -> String {
    let company = submission.text(keys::COMPANY_NAME).unwrap_or("Applicant");
    format!(
        "{}_{}.{}",
        underscore_whitespace(label),
        underscore_whitespace(company),
        extension
    )
}

fn underscore_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_gap = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_gap {
                out.push('_');
            }
            in_gap = true;
        } else {
            out.push(c);
            in_gap = false;
        }
    }
    out
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("failed to render application document: {0}")]
    Render(#[from] RenderError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}
