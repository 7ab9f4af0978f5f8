use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use permit_intake::config::IntakeConfig;
use permit_intake::error::AppError;
use permit_intake::workflows::intake::{
    Attachment, CreatedTask, FieldCatalog, FieldMapper, RawSubmission, SinkError, TaskDraft,
    TaskSink,
};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Sink used by `serve --dry-run` and the CLI: keeps tasks in memory.
#[derive(Default, Clone)]
pub(crate) struct InMemoryTaskSink {
    tasks: Arc<Mutex<Vec<TaskDraft>>>,
    uploads: Arc<Mutex<Vec<(String, String)>>>,
}

impl InMemoryTaskSink {
    pub(crate) fn tasks(&self) -> Vec<TaskDraft> {
        self.tasks.lock().expect("task mutex poisoned").clone()
    }

    /// `(task id, filename)` per upload.
    pub(crate) fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().expect("upload mutex poisoned").clone()
    }
}

impl TaskSink for InMemoryTaskSink {
    async fn create_task(&self, draft: &TaskDraft) -> Result<CreatedTask, SinkError> {
        let mut guard = self.tasks.lock().expect("task mutex poisoned");
        guard.push(draft.clone());
        Ok(CreatedTask {
            id: format!("dry-run-{}", guard.len()),
            permalink: None,
        })
    }

    async fn attach(&self, task: &CreatedTask, attachment: Attachment) -> Result<(), SinkError> {
        let mut guard = self.uploads.lock().expect("upload mutex poisoned");
        guard.push((task.id.clone(), attachment.filename));
        Ok(())
    }

    fn task_url(&self, task: &CreatedTask) -> String {
        format!("memory://tasks/{}", task.id)
    }
}

/// Standard catalog unless `PERMIT_CATALOG_PATH` points at a JSON override.
pub(crate) fn load_mapper(config: &IntakeConfig) -> Result<FieldMapper, AppError> {
    let catalog = match &config.catalog_path {
        Some(path) => FieldCatalog::from_path(path)?,
        None => FieldCatalog::standard(),
    };
    Ok(FieldMapper::new(&catalog)?)
}

pub(crate) fn read_submission(path: &Path) -> Result<RawSubmission, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use permit_intake::workflows::intake::NormalizedFieldSet;

    fn draft(name: &str) -> TaskDraft {
        TaskDraft {
            name: name.to_string(),
            notes: String::new(),
            custom_fields: NormalizedFieldSet::default(),
            due_on: None,
        }
    }

    #[tokio::test]
    async fn in_memory_sink_numbers_tasks_sequentially() {
        let sink = InMemoryTaskSink::default();
        let first = sink.create_task(&draft("one")).await.expect("create");
        let second = sink.create_task(&draft("two")).await.expect("create");

        assert_eq!(first.id, "dry-run-1");
        assert_eq!(second.id, "dry-run-2");
        assert_eq!(sink.task_url(&second), "memory://tasks/dry-run-2");
        assert_eq!(sink.tasks().len(), 2);

        sink.attach(
            &first,
            Attachment {
                filename: "one.pdf".to_string(),
                content_type: "application/pdf".parse().expect("mime"),
                bytes: b"%PDF-".to_vec(),
            },
        )
        .await
        .expect("attach");
        assert_eq!(
            sink.uploads(),
            vec![("dry-run-1".to_string(), "one.pdf".to_string())]
        );
    }

    #[test]
    fn parse_date_reports_the_bad_value() {
        assert!(parse_date(" 2026-04-01 ").is_ok());
        let err = parse_date("04/01/2026").expect_err("wrong layout");
        assert!(err.contains("04/01/2026"));
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let config = IntakeConfig {
            application_label: "TIS Application".to_string(),
            catalog_path: Some(std::env::temp_dir().join("permit-intake-missing-catalog.json")),
        };
        assert!(matches!(load_mapper(&config), Err(AppError::Catalog(_))));
    }
}
