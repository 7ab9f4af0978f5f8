use serde::{Deserialize, Serialize};

/// Issuing organization details printed on the document and in the task summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    pub organization: String,
    pub department: String,
    pub form_title: String,
    pub office: String,
    pub contact_line: String,
    pub website_label: String,
    pub website_url: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            organization: "Prince William County".to_string(),
            department: "Department of Economic Development".to_string(),
            form_title: "Targeted Industry/Expedited Permitting Application".to_string(),
            office: "Prince William County Department of Economic Development and Tourism"
                .to_string(),
            contact_line:
                "13575 Heathcote Boulevard, Suite 240, Gainesville, VA 20155 | 703-792-5500"
                    .to_string(),
            website_label: "www.pwcded.org".to_string(),
            website_url: "https://www.pwcded.org".to_string(),
        }
    }
}
