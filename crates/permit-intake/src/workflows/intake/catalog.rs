use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Business fields the sink knows about. Declaration order is the order fields are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    CompanyName,
    ContactName,
    ContactEmail,
    ContactPhone,
    ProjectType,
    ProjectAddress,
    SiteSize,
    BuildingSize,
    TotalInvestment,
    LandPurchase,
    Construction,
    EquipmentCost,
    RetainedJobs,
    NewJobsYear1,
    NewJobsYear2,
    NewJobsYear3,
    AverageWage,
    ApplicationDate,
    OccupancyDate,
    SitePlanDate,
    BuildingPlanDate,
    Priority,
    ApplicationStatus,
}

impl FieldKey {
    pub const ALL: [FieldKey; 23] = [
        FieldKey::CompanyName,
        FieldKey::ContactName,
        FieldKey::ContactEmail,
        FieldKey::ContactPhone,
        FieldKey::ProjectType,
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
        FieldKey::ApplicationDate,
        FieldKey::OccupancyDate,
        FieldKey::SitePlanDate,
        FieldKey::BuildingPlanDate,
        FieldKey::Priority,
        FieldKey::ApplicationStatus,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            FieldKey::CompanyName => "companyName",
            FieldKey::ContactName => "contactName",
            FieldKey::ContactEmail => "contactEmail",
            FieldKey::ContactPhone => "contactPhone",
            FieldKey::ProjectType => "projectType",
            FieldKey::ProjectAddress => "projectAddress",
            FieldKey::SiteSize => "siteSize",
            FieldKey::BuildingSize => "buildingSize",
            FieldKey::TotalInvestment => "totalInvestment",
            FieldKey::LandPurchase => "landPurchase",
            FieldKey::Construction => "construction",
            FieldKey::EquipmentCost => "equipmentCost",
            FieldKey::RetainedJobs => "retainedJobs",
            FieldKey::NewJobsYear1 => "newJobsYear1",
            FieldKey::NewJobsYear2 => "newJobsYear2",
            FieldKey::NewJobsYear3 => "newJobsYear3",
            FieldKey::AverageWage => "averageWage",
            FieldKey::ApplicationDate => "applicationDate",
            FieldKey::OccupancyDate => "occupancyDate",
            FieldKey::SitePlanDate => "sitePlanDate",
            FieldKey::BuildingPlanDate => "buildingPlanDate",
            FieldKey::Priority => "priority",
            FieldKey::ApplicationStatus => "applicationStatus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    New,
    Upfit,
    Both,
}

impl ProjectType {
    pub const ALL: [ProjectType; 3] = [ProjectType::New, ProjectType::Upfit, ProjectType::Both];

    pub fn from_key(raw: &str) -> Option<Self> {
        match raw {
            "new" => Some(Self::New),
            "upfit" => Some(Self::Upfit),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Upfit => "upfit",
            Self::Both => "both",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New Construction",
            Self::Upfit => "Upfit/Renovation",
            Self::Both => "New Construction & Upfit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub const fn key(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Complete,
    Incomplete,
    Pending,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Complete,
        ApplicationStatus::Incomplete,
        ApplicationStatus::Pending,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Incomplete => "incomplete",
            Self::Pending => "pending",
        }
    }
}

/// One selectable value of an enum-typed sink field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumOption {
    ProjectType(ProjectType),
    Priority(Priority),
    Status(ApplicationStatus),
}

impl EnumOption {
    fn describe(self) -> String {
        match self {
            EnumOption::ProjectType(kind) => format!("projectTypes.{}", kind.key()),
            EnumOption::Priority(priority) => format!("priorities.{}", priority.key()),
            EnumOption::Status(status) => format!("statuses.{}", status.key()),
        }
    }
}

/// Resolves business fields and enum options to the sink's opaque identifiers.
pub trait SchemaCatalog: Send + Sync {
    fn field_id(&self, key: FieldKey) -> Option<&str>;
    fn option_code(&self, option: EnumOption) -> Option<&str>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("schema catalog is missing entries: {}", .missing.join(", "))]
    Incomplete { missing: Vec<String> },
    #[error("failed to read schema catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid schema catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Table-backed catalog, either the standard deployment tables or a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCatalog {
    pub fields: BTreeMap<FieldKey, String>,
    #[serde(default)]
    pub project_types: BTreeMap<ProjectType, String>,
    #[serde(default)]
    pub priorities: BTreeMap<Priority, String>,
    #[serde(default)]
    pub statuses: BTreeMap<ApplicationStatus, String>,
}

impl FieldCatalog {
    /// Identifiers of the production permit-application project.
    pub fn standard() -> Self {
        const FIELDS: &[(FieldKey, &str)] = &[
            (FieldKey::CompanyName, "1210373107979908"),
            (FieldKey::ContactName, "1210373107979910"),
            (FieldKey::ContactEmail, "1210373107979912"),
            (FieldKey::ContactPhone, "1210373107979914"),
            (FieldKey::ProjectType, "1210373107979916"),
            (FieldKey::ProjectAddress, "1210373108816529"),
            (FieldKey::SiteSize, "1210373108816531"),
            (FieldKey::BuildingSize, "1210373108816533"),
            (FieldKey::TotalInvestment, "1210373108816535"),
            (FieldKey::LandPurchase, "1210373108816537"),
            (FieldKey::Construction, "1210373108816539"),
            (FieldKey::EquipmentCost, "1210373108816541"),
            (FieldKey::RetainedJobs, "1210373108816543"),
            (FieldKey::NewJobsYear1, "1210373108816545"),
            (FieldKey::NewJobsYear2, "1210373108816547"),
            (FieldKey::NewJobsYear3, "1210373108816549"),
            (FieldKey::AverageWage, "1210373108816551"),
            (FieldKey::ApplicationDate, "1210373108816553"),
            (FieldKey::OccupancyDate, "1210373108816555"),
            (FieldKey::SitePlanDate, "1210373108816557"),
            (FieldKey::BuildingPlanDate, "1210373108816559"),
            (FieldKey::Priority, "1210373108825690"),
            (FieldKey::ApplicationStatus, "1210373109511455"),
        ];

        Self {
            fields: owned_table(FIELDS),
            project_types: owned_table(&[
                (ProjectType::New, "1210373107979917"),
                (ProjectType::Upfit, "1210373107979918"),
                (ProjectType::Both, "1210373108816527"),
            ]),
            priorities: owned_table(&[
                (Priority::High, "1210373109215115"),
                (Priority::Medium, "1210373109215116"),
                (Priority::Low, "1210373109215117"),
            ]),
            statuses: owned_table(&[
                (ApplicationStatus::Complete, "1210373109511456"),
                (ApplicationStatus::Incomplete, "1210373109511457"),
                (ApplicationStatus::Pending, "1210373109511458"),
            ]),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

fn owned_table<K: Ord + Copy>(entries: &[(K, &str)]) -> BTreeMap<K, String> {
    entries
        .iter()
        .map(|(key, id)| (*key, (*id).to_string()))
        .collect()
}

impl SchemaCatalog for FieldCatalog {
    fn field_id(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    fn option_code(&self, option: EnumOption) -> Option<&str> {
        let code = match option {
            EnumOption::ProjectType(kind) => self.project_types.get(&kind),
            EnumOption::Priority(priority) => self.priorities.get(&priority),
            EnumOption::Status(status) => self.statuses.get(&status),
        };
        code.map(String::as_str)
    }
}

/// Catalog snapshot proven complete, so lookups during mapping cannot miss.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedSchema {
    fields: Vec<String>,
    project_types: Vec<String>,
    priorities: Vec<String>,
    statuses: Vec<String>,
}

impl ResolvedSchema {
    pub(crate) fn resolve(catalog: &dyn SchemaCatalog) -> Result<Self, CatalogError> {
        let mut missing = Vec::new();

        let fields = FieldKey::ALL
            .iter()
            .map(|key| match catalog.field_id(*key).filter(|id| !id.is_empty()) {
                Some(id) => id.to_string(),
                None => {
                    missing.push(format!("fields.{}", key.name()));
                    String::new()
                }
            })
            .collect();

        let mut options = |choices: Vec<EnumOption>| -> Vec<String> {
            choices
                .into_iter()
                .map(
                    |option| match catalog.option_code(option).filter(|id| !id.is_empty()) {
                        Some(code) => code.to_string(),
                        None => {
                            missing.push(option.describe());
                            String::new()
                        }
                    },
                )
                .collect()
        };

        let project_types = options(
            ProjectType::ALL
                .into_iter()
                .map(EnumOption::ProjectType)
                .collect(),
        );
        let priorities = options(Priority::ALL.into_iter().map(EnumOption::Priority).collect());
        let statuses = options(
            ApplicationStatus::ALL
                .into_iter()
                .map(EnumOption::Status)
                .collect(),
        );

        if !missing.is_empty() {
            return Err(CatalogError::Incomplete { missing });
        }

        Ok(Self {
            fields,
            project_types,
            priorities,
            statuses,
        })
    }

    pub(crate) fn field_id(&self, key: FieldKey) -> &str {
        &self.fields[key as usize]
    }

    pub(crate) fn project_type_code(&self, kind: ProjectType) -> &str {
        &self.project_types[kind as usize]
    }

    pub(crate) fn priority_code(&self, priority: Priority) -> &str {
        &self.priorities[priority as usize]
    }

    pub(crate) fn status_code(&self, status: ApplicationStatus) -> &str {
        &self.statuses[status as usize]
    }
}
