use super::common::*;
use chrono::{TimeZone, Utc};
use serde_json::json;

use crate::workflows::intake::catalog::{
    ApplicationStatus, CatalogError, EnumOption, FieldCatalog, FieldKey, Priority, ProjectType,
    SchemaCatalog,
};
use crate::workflows::intake::submission::keys;
use crate::workflows::intake::{FieldMapper, FieldValue, RawSubmission};

fn priority_for(total_investment: Option<&str>, occupancy: Option<&str>) -> Priority {
    let mut raw = RawSubmission::new();
    if let Some(total) = total_investment {
        raw = raw.with(keys::TOTAL_INVESTMENT, total);
    }
    if let Some(date) = occupancy {
        raw = raw.with(keys::OCCUPANCY_DATE, date);
    }
    mapper().map(&raw, now()).priority
}

#[test]
fn text_fields_pass_through_verbatim() {
    let raw = submission().with(keys::COMPANY_NAME, "Acme <Labs> & Co ");
    let mapped = mapper().map(&raw, now());

    assert_eq!(
        mapped
            .fields
            .get(FieldKey::CompanyName)
            .and_then(FieldValue::as_text),
        Some("Acme <Labs> & Co ")
    );
    assert_eq!(
        mapped
            .fields
            .get(FieldKey::ContactEmail)
            .and_then(FieldValue::as_text),
        Some("jordan@acme.test")
    );
}

#[test]
fn full_submission_emits_fields_in_rule_order() {
    let mapped = mapper().map(&submission(), now());
    assert_eq!(
        mapped.fields.keys(),
        vec![
            FieldKey::CompanyName,
            FieldKey::ContactName,
            FieldKey::ContactEmail,
            FieldKey::ContactPhone,
            FieldKey::ProjectAddress,
            FieldKey::SiteSize,
            FieldKey::BuildingSize,
            FieldKey::TotalInvestment,
            FieldKey::LandPurchase,
            FieldKey::Construction,
            FieldKey::EquipmentCost,
            FieldKey::RetainedJobs,
            FieldKey::NewJobsYear1,
            FieldKey::NewJobsYear2,
            FieldKey::NewJobsYear3,
            FieldKey::AverageWage,
            FieldKey::ProjectType,
            FieldKey::ApplicationDate,
            FieldKey::OccupancyDate,
            FieldKey::SitePlanDate,
            FieldKey::BuildingPlanDate,
            FieldKey::Priority,
            FieldKey::ApplicationStatus,
        ]
    );
    assert_eq!(mapped.total_new_jobs, 45);
}

#[test]
fn missing_numbers_are_omitted_not_zeroed() {
    let raw = RawSubmission::new()
        .with(keys::COMPANY_NAME, "Acme")
        .with(keys::BUILDING_SIZE, "lots")
        .with(keys::RETAINED_JOBS, "");
    let mapped = mapper().map(&raw, now());

    for key in [
        FieldKey::SiteSize,
        FieldKey::BuildingSize,
        FieldKey::TotalInvestment,
        FieldKey::LandPurchase,
        FieldKey::Construction,
        FieldKey::EquipmentCost,
        FieldKey::RetainedJobs,
        FieldKey::NewJobsYear1,
        FieldKey::NewJobsYear2,
        FieldKey::NewJobsYear3,
        FieldKey::AverageWage,
    ] {
        assert!(!mapped.fields.contains(key), "{} should be absent", key.name());
    }
    assert_eq!(mapped.total_new_jobs, 0);
}

#[test]
fn site_size_keeps_fractions_and_integers_truncate() {
    let raw = RawSubmission::new()
        .with(keys::SITE_SIZE, "2.75")
        .with(keys::BUILDING_SIZE, "12000.9");
    let mapped = mapper().map(&raw, now());

    assert_eq!(
        mapped.fields.get(FieldKey::SiteSize),
        Some(&FieldValue::Decimal(2.75))
    );
    assert_eq!(
        mapped
            .fields
            .get(FieldKey::BuildingSize)
            .and_then(FieldValue::as_integer),
        Some(12000)
    );
}

#[test]
fn equipment_cost_sums_furniture_and_computers() {
    let raw = RawSubmission::new()
        .with(keys::FURNITURE, "1000")
        .with(keys::COMPUTERS, "500");
    let mapped = mapper().map(&raw, now());
    assert_eq!(
        mapped
            .fields
            .get(FieldKey::EquipmentCost)
            .and_then(FieldValue::as_integer),
        Some(1500)
    );

    let only_furniture = RawSubmission::new().with(keys::FURNITURE, "750");
    let mapped = mapper().map(&only_furniture, now());
    assert_eq!(
        mapped
            .fields
            .get(FieldKey::EquipmentCost)
            .and_then(FieldValue::as_integer),
        Some(750)
    );
}

#[test]
fn equipment_cost_is_omitted_when_not_positive() {
    let zeros = RawSubmission::new()
        .with(keys::FURNITURE, "0")
        .with(keys::COMPUTERS, "0");
    assert!(!mapper()
        .map(&zeros, now())
        .fields
        .contains(FieldKey::EquipmentCost));
    assert!(!mapper()
        .map(&RawSubmission::new(), now())
        .fields
        .contains(FieldKey::EquipmentCost));
}

#[test]
fn aggregates_saturate_instead_of_overflowing() {
    let raw = RawSubmission::new()
        .with(keys::FURNITURE, "9223372036854775807")
        .with(keys::COMPUTERS, "1")
        .with(keys::NEW_JOBS_YEAR_1, "9223372036854775807")
        .with(keys::NEW_JOBS_YEAR_2, "1");
    let mapped = mapper().map(&raw, now());

    assert_eq!(
        mapped
            .fields
            .get(FieldKey::EquipmentCost)
            .and_then(FieldValue::as_integer),
        Some(i64::MAX)
    );
    assert_eq!(mapped.total_new_jobs, i64::MAX);
}

#[test]
fn project_type_resolves_known_keys_only() {
    let standard = FieldCatalog::standard();

    let upfit = submission().with(keys::PROJECT_TYPE, "upfit");
    let mapped = mapper().map(&upfit, now());
    assert_eq!(
        mapped.fields.get(FieldKey::ProjectType),
        Some(&FieldValue::Enum(
            standard.project_types[&ProjectType::Upfit].clone()
        ))
    );

    let renovation = submission().with(keys::PROJECT_TYPE, "renovation");
    let mapped = mapper().map(&renovation, now());
    assert!(!mapped.fields.contains(FieldKey::ProjectType));
    assert!(mapped.summary.contains("PROJECT TYPE: Not specified"));
}

#[test]
fn application_date_ignores_client_input() {
    let raw = submission().with("applicationDate", "1999-12-31");
    let mapped = mapper().map(&raw, now());
    assert_eq!(
        mapped.fields.get(FieldKey::ApplicationDate),
        Some(&FieldValue::date("2026-01-15"))
    );
}

#[test]
fn milestone_dates_pass_through_without_validation() {
    let raw = RawSubmission::new()
        .with(keys::OCCUPANCY_DATE, "2026-02-30")
        .with(keys::SITE_PLAN_DATE, "spring");
    let mapped = mapper().map(&raw, now());

    assert_eq!(
        mapped.fields.get(FieldKey::OccupancyDate),
        Some(&FieldValue::date("2026-02-30"))
    );
    assert_eq!(
        mapped.fields.get(FieldKey::SitePlanDate),
        Some(&FieldValue::date("spring"))
    );
    assert!(!mapped.fields.contains(FieldKey::BuildingPlanDate));
    assert_eq!(mapped.days_until_occupancy, 999);
}

#[test]
fn priority_follows_investment_and_urgency_thresholds() {
    // now is 2026-01-15T12:00Z; 2026-08-03 is 200 calendar days later.
    assert_eq!(priority_for(Some("6000000"), Some("2026-08-03")), Priority::High);
    assert_eq!(priority_for(Some("0"), Some("2026-01-25")), Priority::High);
    assert_eq!(priority_for(Some("1500000"), Some("2026-08-03")), Priority::Medium);
    assert_eq!(priority_for(Some("0"), None), Priority::Low);
    assert_eq!(priority_for(None, None), Priority::Low);
}

#[test]
fn priority_thresholds_are_strict() {
    let midnight = Utc
        .with_ymd_and_hms(2026, 1, 15, 0, 0, 0)
        .single()
        .expect("valid instant");
    let exactly_ninety = RawSubmission::new()
        .with(keys::TOTAL_INVESTMENT, "0")
        .with(keys::OCCUPANCY_DATE, "2026-04-15");
    let mapped = mapper().map(&exactly_ninety, midnight);
    assert_eq!(mapped.days_until_occupancy, 90);
    assert_eq!(mapped.priority, Priority::Medium);

    assert_eq!(priority_for(Some("1000000"), None), Priority::Low);
    assert_eq!(priority_for(Some("5000000"), None), Priority::Medium);
}

#[test]
fn priority_and_status_are_always_emitted() {
    let standard = FieldCatalog::standard();
    let mapped = mapper().map(&RawSubmission::new(), now());

    assert_eq!(mapped.status, ApplicationStatus::Complete);
    assert_eq!(
        mapped.fields.get(FieldKey::ApplicationStatus),
        Some(&FieldValue::Enum(
            standard.statuses[&ApplicationStatus::Complete].clone()
        ))
    );
    assert_eq!(
        mapped.fields.get(FieldKey::Priority),
        Some(&FieldValue::Enum(standard.priorities[&Priority::Low].clone()))
    );
    assert_eq!(mapped.fields.len(), 3);
}

struct PrefixedCatalog;

impl SchemaCatalog for PrefixedCatalog {
    fn field_id(&self, key: FieldKey) -> Option<&str> {
        Some(key.name())
    }

    fn option_code(&self, option: EnumOption) -> Option<&str> {
        Some(match option {
            EnumOption::ProjectType(kind) => kind.key(),
            EnumOption::Priority(priority) => priority.key(),
            EnumOption::Status(status) => status.key(),
        })
    }
}

#[test]
fn mapper_runs_against_alternate_schemas() {
    let mapper = FieldMapper::new(&PrefixedCatalog).expect("complete catalog");
    let mapped = mapper.map(&submission(), now());
    let wire = serde_json::to_value(&mapped.fields).expect("serialize");

    assert_eq!(wire["companyName"], json!("Acme  Widgets Inc"));
    assert_eq!(wire["siteSize"], json!(4.5));
    assert_eq!(wire["equipmentCost"], json!(350000));
    assert_eq!(wire["projectType"], json!("new"));
    assert_eq!(wire["priority"], json!("medium"));
    assert_eq!(wire["applicationStatus"], json!("complete"));
    assert_eq!(wire["occupancyDate"], json!({ "date": "2026-12-01" }));
}

#[test]
fn incomplete_catalog_prevents_construction() {
    let mut catalog = FieldCatalog::standard();
    catalog.statuses.remove(&ApplicationStatus::Pending);

    match FieldMapper::new(&catalog) {
        Err(CatalogError::Incomplete { missing }) => {
            assert_eq!(missing, vec!["statuses.pending".to_string()]);
        }
        other => panic!("expected incomplete catalog, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn summary_reports_key_metrics_and_gaps() {
    let raw = submission().with(keys::ACTIVITIES, "");
    let mapped = mapper().map(&raw, now());

    assert!(mapped.summary.starts_with("PERMIT APPLICATION SUMMARY"));
    assert!(mapped.summary.contains("Company: Acme  Widgets Inc"));
    assert!(mapped
        .summary
        .contains("Contact: Jordan Reyes (Director of Operations)"));
    assert!(mapped.summary.contains("Total Investment: $2,500,000"));
    assert!(mapped.summary.contains("New Jobs (3 years): 45"));
    assert!(mapped.summary.contains("Average Wage: $68,000"));
    assert!(mapped.summary.contains("BUSINESS ACTIVITIES\nNot provided"));
}

#[test]
fn mapping_leaves_the_submission_untouched() {
    let raw = submission();
    let before = raw.clone();
    let _ = mapper().map(&raw, now());
    assert_eq!(raw, before);
}
