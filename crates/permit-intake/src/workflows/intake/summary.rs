use super::branding::Branding;
use super::format::{money, project_type_label, NOT_PROVIDED};
use super::submission::{keys, RawSubmission};
use std::fmt::Write as _;

/// Plain-text digest used as the task description in the sink.
pub(crate) fn task_description(
    submission: &RawSubmission,
    total_new_jobs: i64,
    branding: &Branding,
) -> String {
    let text = |key: &str| submission.text(key).unwrap_or(NOT_PROVIDED);
    let total_investment = submission.integer(keys::TOTAL_INVESTMENT).unwrap_or(0);
    let average_wage = submission.integer(keys::AVERAGE_WAGE).unwrap_or(0);
    let retained_jobs = submission.integer(keys::RETAINED_JOBS).unwrap_or(0);

    let contact = match submission.text(keys::CONTACT_TITLE) {
        Some(title) => format!("{} ({})", text(keys::CONTACT_NAME), title),
        None => text(keys::CONTACT_NAME).to_string(),
    };

    let mut notes = String::new();
    writeln!(
        &mut notes,
        "PERMIT APPLICATION SUMMARY\n========================\n"
    )
    .expect("write heading");
    writeln!(
        &mut notes,
        "Company: {}\nContact: {contact}\nEmail: {}\nPhone: {}\n",
        text(keys::COMPANY_NAME),
        text(keys::CONTACT_EMAIL),
        text(keys::CONTACT_PHONE)
    )
    .expect("write contact");
    writeln!(
        &mut notes,
        "PROJECT LOCATION\n{}\n",
        text(keys::PROJECT_ADDRESS)
    )
    .expect("write location");
    writeln!(
        &mut notes,
        "PROJECT TYPE: {}\n",
        project_type_label(submission.text(keys::PROJECT_TYPE))
    )
    .expect("write project type");
    writeln!(
        &mut notes,
        "BUSINESS ACTIVITIES\n{}\n",
        text(keys::ACTIVITIES)
    )
    .expect("write activities");
    writeln!(&mut notes, "KEY METRICS").expect("write metrics heading");
    writeln!(&mut notes, "\u{2022} Total Investment: {}", money(total_investment))
        .expect("write total investment");
    writeln!(&mut notes, "\u{2022} New Jobs (3 years): {total_new_jobs}")
        .expect("write new jobs");
    writeln!(&mut notes, "\u{2022} Average Wage: {}", money(average_wage))
        .expect("write average wage");
    writeln!(&mut notes, "\u{2022} Jobs Retained: {retained_jobs}\n")
        .expect("write retained jobs");
    writeln!(
        &mut notes,
        "See attached PDF for complete application details.\n"
    )
    .expect("write attachment note");
    write!(
        &mut notes,
        "---\nThis task was automatically created from the {} permit application form.",
        branding.organization
    )
    .expect("write footer");
    notes
}
