//! Asana REST adapter for [`TaskSink`].

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

use super::sink::{Attachment, CreatedTask, SinkError, TaskDraft, TaskSink};
use crate::config::SinkCredentials;

const APP_BASE_URL: &str = "https://app.asana.com/0";

pub struct AsanaSink {
    client: Client,
    credentials: SinkCredentials,
}

impl AsanaSink {
    pub fn new(credentials: SinkCredentials) -> Result<Self, SinkError> {
        let client = Client::builder()
            .user_agent(concat!("permit-intake/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| SinkError::Transport(err.to_string()))?;
        Ok(Self::with_client(client, credentials))
    }

    pub fn with_client(client: Client, credentials: SinkCredentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.credentials.base_url, path)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct TaskPayload {
    gid: String,
    #[serde(default)]
    permalink_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

async fn reject(response: Response) -> SinkError {
    let status = response.status().as_u16();
    let raw = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ErrorEnvelope>(&raw)
        .ok()
        .and_then(|envelope| envelope.errors.into_iter().next())
        .map(|detail| detail.message)
        .unwrap_or(raw);
    SinkError::Rejected { status, body }
}

impl TaskSink for AsanaSink {
    async fn create_task(&self, draft: &TaskDraft) -> Result<CreatedTask, SinkError> {
        let mut data = json!({
            "name": draft.name,
            "notes": draft.notes,
            "projects": [self.credentials.project_id],
            "custom_fields": draft.custom_fields,
        });
        if let Some(due_on) = &draft.due_on {
            data["due_on"] = json!(due_on);
        }

        let response = self
            .client
            .post(self.endpoint("tasks"))
            .bearer_auth(&self.credentials.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&json!({ "data": data }))
            .send()
            .await
            .map_err(|err| SinkError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(reject(response).await);
        }

        let envelope: Envelope<TaskPayload> = response
            .json()
            .await
            .map_err(|err| SinkError::Malformed(err.to_string()))?;

        Ok(CreatedTask {
            id: envelope.data.gid,
            permalink: envelope.data.permalink_url,
        })
    }

    async fn attach(&self, task: &CreatedTask, attachment: Attachment) -> Result<(), SinkError> {
        let file = Part::bytes(attachment.bytes)
            .file_name(attachment.filename)
            .mime_str(attachment.content_type.as_ref())
            .map_err(|err| SinkError::Transport(err.to_string()))?;
        let form = Form::new().text("parent", task.id.clone()).part("file", file);

        let response = self
            .client
            .post(self.endpoint("attachments"))
            .bearer_auth(&self.credentials.access_token)
            .multipart(form)
            .send()
            .await
            .map_err(|err| SinkError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        Ok(())
    }

    fn task_url(&self, task: &CreatedTask) -> String {
        format!(
            "{APP_BASE_URL}/{}/{}",
            self.credentials.project_id, task.id
        )
    }
}
