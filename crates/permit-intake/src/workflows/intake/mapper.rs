use super::branding::Branding;
use super::catalog::{
    ApplicationStatus, CatalogError, FieldKey, Priority, ProjectType, ResolvedSchema,
    SchemaCatalog,
};
use super::fields::{FieldValue, NormalizedFieldSet};
use super::priority::{classify, days_until_occupancy};
use super::submission::{keys, RawSubmission};
use super::summary::task_description;
use chrono::{DateTime, Utc};

const TEXT_FIELDS: [(FieldKey, &str); 5] = [
    (FieldKey::CompanyName, keys::COMPANY_NAME),
    (FieldKey::ContactName, keys::CONTACT_NAME),
    (FieldKey::ContactEmail, keys::CONTACT_EMAIL),
    (FieldKey::ContactPhone, keys::CONTACT_PHONE),
    (FieldKey::ProjectAddress, keys::PROJECT_ADDRESS),
];

const INTEGER_FIELDS: [(FieldKey, &str); 4] = [
    (FieldKey::BuildingSize, keys::BUILDING_SIZE),
    (FieldKey::TotalInvestment, keys::TOTAL_INVESTMENT),
    (FieldKey::LandPurchase, keys::LAND_PURCHASE),
    (FieldKey::Construction, keys::CONSTRUCTION),
];

const WORKFORCE_FIELDS: [(FieldKey, &str); 5] = [
    (FieldKey::RetainedJobs, keys::RETAINED_JOBS),
    (FieldKey::NewJobsYear1, keys::NEW_JOBS_YEAR_1),
    (FieldKey::NewJobsYear2, keys::NEW_JOBS_YEAR_2),
    (FieldKey::NewJobsYear3, keys::NEW_JOBS_YEAR_3),
    (FieldKey::AverageWage, keys::AVERAGE_WAGE),
];

const MILESTONE_FIELDS: [(FieldKey, &str); 3] = [
    (FieldKey::OccupancyDate, keys::OCCUPANCY_DATE),
    (FieldKey::SitePlanDate, keys::SITE_PLAN_DATE),
    (FieldKey::BuildingPlanDate, keys::BUILDING_PLAN_DATE),
];

/// Result of mapping one submission: the sink field set plus the values derived on the way.
#[derive(Debug, Clone)]
pub struct MappedSubmission {
    pub fields: NormalizedFieldSet,
    pub summary: String,
    pub priority: Priority,
    pub status: ApplicationStatus,
    pub total_new_jobs: i64,
    pub days_until_occupancy: i64,
}

/// Stateless mapper from raw form records to sink fields.
#[derive(Debug, Clone)]
pub struct FieldMapper {
    schema: ResolvedSchema,
    branding: Branding,
}

impl FieldMapper {
    /// Fails when the catalog cannot resolve every field or option.
    pub fn new(catalog: &dyn SchemaCatalog) -> Result<Self, CatalogError> {
        Ok(Self {
            schema: ResolvedSchema::resolve(catalog)?,
            branding: Branding::default(),
        })
    }

    pub fn with_branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    pub fn map(&self, submission: &RawSubmission, now: DateTime<Utc>) -> MappedSubmission {
        let mut fields = NormalizedFieldSet::default();
        let schema = &self.schema;

        for (key, source) in TEXT_FIELDS {
            if let Some(value) = submission.text(source) {
                fields.insert(key, schema.field_id(key), FieldValue::Text(value.to_string()));
            }
        }

        if let Some(acres) = submission.decimal(keys::SITE_SIZE) {
            fields.insert(
                FieldKey::SiteSize,
                schema.field_id(FieldKey::SiteSize),
                FieldValue::Decimal(acres),
            );
        }

        for (key, source) in INTEGER_FIELDS {
            if let Some(value) = submission.integer(source) {
                fields.insert(key, schema.field_id(key), FieldValue::Integer(value));
            }
        }

        let equipment_cost = submission
            .integer(keys::FURNITURE)
            .unwrap_or(0)
            .saturating_add(submission.integer(keys::COMPUTERS).unwrap_or(0));
        if equipment_cost > 0 {
            fields.insert(
                FieldKey::EquipmentCost,
                schema.field_id(FieldKey::EquipmentCost),
                FieldValue::Integer(equipment_cost),
            );
        }

        for (key, source) in WORKFORCE_FIELDS {
            if let Some(value) = submission.integer(source) {
                fields.insert(key, schema.field_id(key), FieldValue::Integer(value));
            }
        }

        if let Some(kind) = submission
            .text(keys::PROJECT_TYPE)
            .and_then(ProjectType::from_key)
        {
            fields.insert(
                FieldKey::ProjectType,
                schema.field_id(FieldKey::ProjectType),
                FieldValue::Enum(schema.project_type_code(kind).to_string()),
            );
        }

        fields.insert(
            FieldKey::ApplicationDate,
            schema.field_id(FieldKey::ApplicationDate),
            FieldValue::date(now.date_naive().format("%Y-%m-%d").to_string()),
        );
        for (key, source) in MILESTONE_FIELDS {
            if let Some(raw) = submission.text(source) {
                fields.insert(key, schema.field_id(key), FieldValue::date(raw));
            }
        }

        let days_until_occupancy = days_until_occupancy(submission.date(keys::OCCUPANCY_DATE), now);
        let total_investment = submission.integer(keys::TOTAL_INVESTMENT).unwrap_or(0);
        let priority = classify(total_investment, days_until_occupancy);
        fields.insert(
            FieldKey::Priority,
            schema.field_id(FieldKey::Priority),
            FieldValue::Enum(schema.priority_code(priority).to_string()),
        );

        let status = ApplicationStatus::Complete;
        fields.insert(
            FieldKey::ApplicationStatus,
            schema.field_id(FieldKey::ApplicationStatus),
            FieldValue::Enum(schema.status_code(status).to_string()),
        );

        let total_new_jobs = total_new_jobs(submission);
        let summary = task_description(submission, total_new_jobs, &self.branding);

        MappedSubmission {
            fields,
            summary,
            priority,
            status,
            total_new_jobs,
            days_until_occupancy,
        }
    }
}

/// Three-year hiring total; missing years count as zero. Saturates at the `i64` bounds.
pub fn total_new_jobs(submission: &RawSubmission) -> i64 {
    [keys::NEW_JOBS_YEAR_1, keys::NEW_JOBS_YEAR_2, keys::NEW_JOBS_YEAR_3]
        .into_iter()
        .map(|key| submission.integer(key).unwrap_or(0))
        .fold(0_i64, i64::saturating_add)
}
