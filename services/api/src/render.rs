use crate::infra::{load_mapper, parse_date, read_submission, InMemoryTaskSink};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use permit_intake::config::AppConfig;
use permit_intake::error::AppError;
use permit_intake::workflows::intake::{
    DocumentRenderer, IntakeService, RenderFormat, RenderedArtifact,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RenderArgs {
    /// Submission JSON file, shaped like the form POST body
    pub(crate) input: PathBuf,
    /// Destination file. Defaults to `<label>_<company>.<ext>` in the current directory.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Document format (pdf, html or text). Inferred from `--output` when omitted.
    #[arg(long)]
    pub(crate) format: Option<RenderFormat>,
    /// Application date printed on the document (defaults to today in UTC)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct FieldsArgs {
    /// Submission JSON file, shaped like the form POST body
    pub(crate) input: PathBuf,
    /// Evaluate priority as of this date, at noon UTC (defaults to now)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

fn offline_service(config: &AppConfig) -> Result<IntakeService<InMemoryTaskSink>, AppError> {
    let mapper = load_mapper(&config.intake)?;
    Ok(IntakeService::new(
        mapper,
        DocumentRenderer::default(),
        Arc::new(InMemoryTaskSink::default()),
    )
    .with_label(config.intake.application_label.clone()))
}

/// Explicit format, else whatever the output extension names, else PDF.
pub(crate) fn resolve_format(explicit: Option<RenderFormat>, output: Option<&Path>) -> RenderFormat {
    explicit
        .or_else(|| {
            output
                .and_then(|path| mime_guess::from_path(path).first())
                .and_then(|mime| RenderFormat::from_mime(&mime))
        })
        .unwrap_or_default()
}

pub(crate) fn run_render(args: RenderArgs) -> Result<(), AppError> {
    let RenderArgs {
        input,
        output,
        format,
        date,
    } = args;

    let config = AppConfig::load()?;
    let service = offline_service(&config)?;
    let submission = read_submission(&input)?;
    let today = application_date(date);
    let format = resolve_format(format, output.as_deref());

    let artifact = service.render(&submission, today, format)?;
    let destination = output.unwrap_or_else(|| PathBuf::from(&artifact.filename));
    write_artifact(&artifact, &destination)?;

    println!(
        "Rendered {} ({} page{}, {} bytes) to {}",
        format,
        artifact.page_count,
        if artifact.page_count == 1 { "" } else { "s" },
        artifact.bytes.len(),
        destination.display()
    );
    Ok(())
}

fn write_artifact(artifact: &RenderedArtifact, destination: &Path) -> Result<(), AppError> {
    std::fs::write(destination, &artifact.bytes)?;
    Ok(())
}

pub(crate) fn run_fields(args: FieldsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = offline_service(&config)?;
    let submission = read_submission(&args.input)?;
    let now = evaluation_instant(args.date);

    let mapped = service.map(&submission, now);
    let payload = json!({
        "name": service.task_title(&submission),
        "customFields": mapped.fields,
        "priority": mapped.priority.key(),
        "status": mapped.status.key(),
        "totalNewJobs": mapped.total_new_jobs,
        "daysUntilOccupancy": mapped.days_until_occupancy,
        "notes": mapped.summary,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// Server-clock (UTC) date unless one is given, matching the HTTP surface.
fn application_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Utc::now().date_naive())
}

fn evaluation_instant(date: Option<NaiveDate>) -> DateTime<Utc> {
    date.and_then(|date| date.and_hms_opt(12, 0, 0))
        .map(|noon| noon.and_utc())
        .unwrap_or_else(Utc::now)
}
