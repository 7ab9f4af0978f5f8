use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::intake::sink::{Attachment, CreatedTask, SinkError, TaskDraft, TaskSink};
use crate::workflows::intake::submission::keys;
use crate::workflows::intake::{
    DocumentRenderer, FieldCatalog, FieldMapper, IntakeService, RawSubmission,
};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn today() -> NaiveDate {
    now().date_naive()
}

pub(super) fn mapper() -> FieldMapper {
    FieldMapper::new(&FieldCatalog::standard()).expect("standard catalog resolves")
}

pub(super) fn submission() -> RawSubmission {
    RawSubmission::new()
        .with(keys::COMPANY_NAME, "Acme  Widgets Inc")
        .with(keys::HQ_ADDRESS, "1 Main Street, Richmond, VA")
        .with(keys::CONTACT_NAME, "Jordan Reyes")
        .with(keys::CONTACT_TITLE, "Director of Operations")
        .with(keys::CONTACT_EMAIL, "jordan@acme.test")
        .with(keys::CONTACT_PHONE, "703-555-0100")
        .with(keys::PROJECT_ADDRESS, "9000 Innovation Dr, Manassas, VA")
        .with(keys::PROJECT_TYPE, "new")
        .with(
            keys::ACTIVITIES,
            "Precision machining and assembly of industrial widgets.",
        )
        .with(keys::SITE_SIZE, "4.5")
        .with(keys::BUILDING_SIZE, "42000")
        .with(keys::UPFIT_SIZE, "12000")
        .with(keys::RETAINED_JOBS, "25")
        .with(keys::NEW_JOBS_YEAR_1, "10")
        .with(keys::NEW_JOBS_YEAR_2, "15")
        .with(keys::NEW_JOBS_YEAR_3, "20")
        .with(keys::AVERAGE_WAGE, "68000")
        .with(keys::PEOPLE_MOVING, "6")
        .with(keys::TOTAL_INVESTMENT, "2500000")
        .with(keys::LAND_PURCHASE, "900000")
        .with(keys::CONSTRUCTION, "1250000")
        .with(keys::FURNITURE, "200000")
        .with(keys::COMPUTERS, "150000")
        .with(keys::OWNERSHIP_TYPE, "own")
        .with(keys::SITE_PLAN_DATE, "2026-03-01")
        .with(keys::BUILDING_PLAN_DATE, "2026-05-15")
        .with(keys::UPFIT_PLAN_DATE, "2026-06-01")
        .with(keys::OCCUPANCY_DATE, "2026-12-01")
        .with(keys::ANNUAL_REPORTS, true)
        .with(keys::PUBLIC_ANNOUNCEMENT, false)
        .with(keys::SIGNATURE, "Jordan Reyes")
        .with(keys::DATE_SIGN, "2026-01-14")
}

#[derive(Default)]
pub(super) struct RecordingSink {
    pub(super) drafts: Mutex<Vec<TaskDraft>>,
    pub(super) attachments: Mutex<Vec<Attachment>>,
    pub(super) permalink: Option<String>,
    pub(super) fail_create: bool,
    pub(super) fail_attach: bool,
}

impl RecordingSink {
    pub(super) fn drafts(&self) -> Vec<TaskDraft> {
        self.drafts.lock().expect("drafts mutex poisoned").clone()
    }

    pub(super) fn attachments(&self) -> Vec<Attachment> {
        self.attachments
            .lock()
            .expect("attachments mutex poisoned")
            .clone()
    }
}

impl TaskSink for RecordingSink {
    async fn create_task(&self, draft: &TaskDraft) -> Result<CreatedTask, SinkError> {
        if self.fail_create {
            return Err(SinkError::Rejected {
                status: 400,
                body: "project: Not a valid gid".to_string(),
            });
        }
        let mut drafts = self.drafts.lock().expect("drafts mutex poisoned");
        drafts.push(draft.clone());
        Ok(CreatedTask {
            id: format!("task-{}", drafts.len()),
            permalink: self.permalink.clone(),
        })
    }

    async fn attach(&self, _task: &CreatedTask, attachment: Attachment) -> Result<(), SinkError> {
        if self.fail_attach {
            return Err(SinkError::Transport("connection reset".to_string()));
        }
        self.attachments
            .lock()
            .expect("attachments mutex poisoned")
            .push(attachment);
        Ok(())
    }

    fn task_url(&self, task: &CreatedTask) -> String {
        format!("https://tasks.example.test/0/project/{}", task.id)
    }
}

pub(super) fn service_with(sink: RecordingSink) -> (IntakeService<RecordingSink>, Arc<RecordingSink>) {
    let sink = Arc::new(sink);
    let service = IntakeService::new(mapper(), DocumentRenderer::default(), sink.clone());
    (service, sink)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body to bytes");
    serde_json::from_slice(&body).expect("valid json")
}
