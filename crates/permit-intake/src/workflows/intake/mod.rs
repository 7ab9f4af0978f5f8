//! Permit application intake: field mapping, document rendering and sink delivery.
//!
//! [`FieldMapper`] and [`DocumentRenderer`] are pure and synchronous. [`IntakeService`]
//! composes them with a [`TaskSink`] and is the only place that logs or awaits.

pub mod asana;
pub mod branding;
pub mod catalog;
pub mod document;
pub mod fields;
pub mod format;
pub mod mapper;
pub mod priority;
pub mod router;
pub mod service;
pub mod sink;
pub mod submission;
mod summary;

#[cfg(test)]
mod tests;

pub use asana::AsanaSink;
pub use branding::Branding;
pub use catalog::{
    ApplicationStatus, CatalogError, EnumOption, FieldCatalog, FieldKey, Priority, ProjectType,
    SchemaCatalog,
};
pub use document::{
    DocumentBackend, DocumentRenderer, LayoutBlock, RenderError, RenderFormat, RenderedDocument,
};
pub use fields::{FieldValue, NormalizedField, NormalizedFieldSet};
pub use mapper::{FieldMapper, MappedSubmission};
pub use router::intake_router;
pub use service::{IntakeError, IntakeService, RenderedArtifact, SubmissionReceipt};
pub use sink::{Attachment, CreatedTask, SinkError, TaskDraft, TaskSink};
pub use submission::RawSubmission;
