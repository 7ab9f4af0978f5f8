use super::layout::LayoutEngine;
use super::metrics::{line_height, wrap};
use super::{
    Align, Color, RenderedDocument, Span, TextLine, CONTENT_WIDTH, MARGIN, PAGE_HEIGHT,
};
use crate::workflows::intake::branding::Branding;
use crate::workflows::intake::format::{
    display_date, group_thousands, money, project_type_label, us_date, yes_no, NOT_PROVIDED,
};
use crate::workflows::intake::mapper::total_new_jobs;
use crate::workflows::intake::submission::{keys, RawSubmission};
use chrono::NaiveDate;

/// Cursor depth after Employment Impact beyond which Capital Investment starts a new page.
pub const PAGINATION_THRESHOLD: f32 = 500.0;

const BANNER_HEIGHT: f32 = 6.0;
const HEADER_SIZE: f32 = 14.0;
const FIELD_SIZE: f32 = 11.0;
const NOTE_SIZE: f32 = 10.0;
const HIGHLIGHT_SIZE: f32 = 12.0;
const FOOTER_SIZE: f32 = 9.0;
const EMPLOYMENT_BOX_HEIGHT: f32 = 60.0;
const SIGNATURE_BOX_HEIGHT: f32 = 80.0;
const FOOTER_OFFSET: f32 = 80.0;
const PARAGRAPH_INDENT: f32 = 20.0;

const CERTIFICATION: &str = "I certify that all items in this application are accurate and \
complete to the best of my knowledge.";

const FIELD_COLORS: (Color, Color) = (Color::LABEL, Color::BLACK);

/// Lays a submission out into the fixed application template.
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    branding: Branding,
}

impl DocumentRenderer {
    pub fn new(branding: Branding) -> Self {
        Self { branding }
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    /// `today` is printed as the application date; nothing else depends on the clock.
    pub fn render(&self, submission: &RawSubmission, today: NaiveDate) -> RenderedDocument {
        let mut engine = LayoutEngine::new();
        let mut page = TemplatePass {
            engine: &mut engine,
            submission,
        };

        page.header(&self.branding, today);
        page.company_information();
        page.project_details();
        page.employment_impact();
        if !page.engine.break_if_below(PAGINATION_THRESHOLD) {
            page.engine.move_down(1.0, FIELD_SIZE);
        }
        page.capital_investment();
        page.project_timeline();
        page.commitments();
        page.signature();
        page.footer(&self.branding);

        engine.finish()
    }
}

struct TemplatePass<'a> {
    engine: &'a mut LayoutEngine,
    submission: &'a RawSubmission,
}

impl TemplatePass<'_> {
    fn text_or_missing(&self, key: &str) -> String {
        self.submission
            .display(key)
            .unwrap_or_else(|| NOT_PROVIDED.to_string())
    }

    fn field(&mut self, label: &str, value: &str) {
        self.engine.field(label, value, FIELD_SIZE, FIELD_COLORS);
    }

    fn section(&mut self, title: &str) {
        self.engine.section_header(title, HEADER_SIZE, Color::NAVY);
        self.engine.move_down(0.5, HEADER_SIZE);
    }

    fn money_or_missing(&self, key: &str) -> String {
        self.submission
            .integer(key)
            .map(money)
            .unwrap_or_else(|| NOT_PROVIDED.to_string())
    }

    fn date_or_missing(&self, key: &str) -> String {
        self.submission
            .text(key)
            .map(display_date)
            .unwrap_or_else(|| NOT_PROVIDED.to_string())
    }

    fn header(&mut self, branding: &Branding, today: NaiveDate) {
        self.engine.banner(BANNER_HEIGHT, Color::ACCENT);
        self.engine.title(vec![
            (branding.organization.clone(), 24.0, Color::NAVY),
            (branding.department.clone(), 18.0, Color::NAVY),
            (branding.form_title.clone(), 14.0, Color::NAVY),
        ]);
        self.engine.move_down(2.0, 14.0);
        self.engine.line(
            vec![Span::new(
                format!("Application Date: {}", us_date(today)),
                NOTE_SIZE,
                Color::LABEL,
            )],
            Align::Right,
        );
        self.engine.move_down(1.0, NOTE_SIZE);
    }

    fn company_information(&mut self) {
        self.section("Company Information");
        let company = self.text_or_missing(keys::COMPANY_NAME);
        let headquarters = self.text_or_missing(keys::HQ_ADDRESS);
        let location = self.text_or_missing(keys::PROJECT_ADDRESS);
        self.field("Company Name", &company);
        self.field("Headquarters Address", &headquarters);
        self.field("Project Location", &location);
        self.engine.move_down(1.0, FIELD_SIZE);

        let contact = [keys::CONTACT_NAME, keys::CONTACT_TITLE]
            .into_iter()
            .filter_map(|key| self.submission.text(key))
            .collect::<Vec<_>>()
            .join(", ");
        let contact = if contact.is_empty() {
            NOT_PROVIDED.to_string()
        } else {
            contact
        };
        let phone = self.text_or_missing(keys::CONTACT_PHONE);
        let email = self.text_or_missing(keys::CONTACT_EMAIL);
        self.field("Contact Person", &contact);
        self.field("Phone", &phone);
        self.field("Email", &email);
        self.engine.move_down(1.0, FIELD_SIZE);
    }

    fn project_details(&mut self) {
        self.section("Project Details");
        let project_type = project_type_label(self.submission.text(keys::PROJECT_TYPE));
        self.field("Project Type", project_type);

        self.engine.line(
            vec![Span::new("Business Activities:", FIELD_SIZE, Color::BODY)],
            Align::Left,
        );
        let activities = self.text_or_missing(keys::ACTIVITIES);
        self.engine
            .paragraph(&activities, NOTE_SIZE, Color::PARAGRAPH, PARAGRAPH_INDENT);
        self.engine.move_down(1.0, NOTE_SIZE);

        let site = self
            .submission
            .display(keys::SITE_SIZE)
            .map(|acres| format!("{acres} acres"))
            .unwrap_or_else(|| NOT_PROVIDED.to_string());
        let building = self.square_feet(keys::BUILDING_SIZE);
        let upfit = self.square_feet(keys::UPFIT_SIZE);
        self.field("Site Size", &site);
        self.field("Building Size", &building);
        self.field("Upfit Size", &upfit);
        self.engine.move_down(1.0, FIELD_SIZE);
    }

    fn square_feet(&self, key: &str) -> String {
        self.submission
            .integer(key)
            .map(|value| format!("{} sq ft", group_thousands(value)))
            .unwrap_or_else(|| NOT_PROVIDED.to_string())
    }

    fn employment_impact(&mut self) {
        self.section("Employment Impact");

        let jobs = total_new_jobs(self.submission);
        let wage = self.submission.integer(keys::AVERAGE_WAGE).unwrap_or(0);
        let top = self
            .engine
            .callout(EMPLOYMENT_BOX_HEIGHT, Color::ACCENT, |top| {
                let inset = MARGIN + 10.0;
                vec![
                    TextLine::placed(
                        inset,
                        CONTENT_WIDTH - 20.0,
                        top + 10.0,
                        Align::Left,
                        vec![Span::new(
                            format!("Total New Jobs: {jobs}"),
                            HIGHLIGHT_SIZE,
                            Color::ACCENT,
                        )],
                    ),
                    TextLine::placed(
                        inset,
                        CONTENT_WIDTH - 20.0,
                        top + 30.0,
                        Align::Left,
                        vec![Span::new(
                            format!("Average Annual Wage: {}", money(wage)),
                            FIELD_SIZE,
                            Color::NAVY,
                        )],
                    ),
                ]
            });
        self.engine.move_to(top + EMPLOYMENT_BOX_HEIGHT + 10.0);

        for (label, key) in [
            ("Jobs to be Retained", keys::RETAINED_JOBS),
            ("New Jobs - Year 1", keys::NEW_JOBS_YEAR_1),
            ("New Jobs - Year 2", keys::NEW_JOBS_YEAR_2),
            ("New Jobs - Year 3", keys::NEW_JOBS_YEAR_3),
            ("Expected New Residents", keys::PEOPLE_MOVING),
        ] {
            let value = self.text_or_missing(key);
            self.field(label, &value);
        }
    }

    fn capital_investment(&mut self) {
        self.section("Capital Investment");
        for (label, key) in [
            ("Land/Building Purchase", keys::LAND_PURCHASE),
            ("Construction/Upfit", keys::CONSTRUCTION),
            ("Furniture, Fixtures & Equipment", keys::FURNITURE),
            ("Computer & Peripheral Equipment", keys::COMPUTERS),
        ] {
            let value = self.money_or_missing(key);
            self.field(label, &value);
        }

        self.engine.move_down(0.5, FIELD_SIZE);
        let total = self.submission.integer(keys::TOTAL_INVESTMENT).unwrap_or(0);
        self.engine.line(
            vec![
                Span::new("TOTAL INVESTMENT: ", HIGHLIGHT_SIZE, Color::ACCENT),
                Span::new(money(total), HIGHLIGHT_SIZE, Color::NAVY),
            ],
            Align::Left,
        );
        self.engine.move_down(1.0, HIGHLIGHT_SIZE);

        let leased = self.submission.text(keys::OWNERSHIP_TYPE) == Some("lease");
        if let Some(term) = self
            .submission
            .display(keys::LEASE_TERM)
            .filter(|_| leased)
        {
            self.field("Lease Term", &format!("{term} years"));
            if let Some(payment) = self.submission.integer(keys::LEASE_PAYMENTS) {
                self.field("Annual Lease Payment", &money(payment));
            }
            if let Some(rate) = self.submission.display(keys::LEASE_RATE) {
                self.field("Lease Rate", &rate);
            }
            self.engine.move_down(1.0, FIELD_SIZE);
        }
    }

    fn project_timeline(&mut self) {
        self.section("Project Timeline");
        for (label, key) in [
            ("Site Plan Submittal", keys::SITE_PLAN_DATE),
            ("Building Plan Submittal", keys::BUILDING_PLAN_DATE),
            ("Upfit Plan Submittal", keys::UPFIT_PLAN_DATE),
            ("Desired Occupancy Date", keys::OCCUPANCY_DATE),
        ] {
            let value = self.date_or_missing(key);
            self.field(label, &value);
        }
        self.engine.move_down(1.0, FIELD_SIZE);
    }

    fn commitments(&mut self) {
        self.section("Commitments");
        for (label, key) in [
            ("Annual Employment Reports", keys::ANNUAL_REPORTS),
            ("Public Announcement Agreement", keys::PUBLIC_ANNOUNCEMENT),
        ] {
            let answer = yes_no(self.submission.flag(key));
            self.engine.line(
                vec![
                    Span::new("\u{2022} ", FIELD_SIZE, Color::BODY),
                    Span::new(format!("{label}: {answer}"), FIELD_SIZE, Color::BODY),
                ],
                Align::Left,
            );
        }
        self.engine.move_down(2.0, FIELD_SIZE);
    }

    fn signature(&mut self) {
        self.section("Signature");
        let certification = wrap(CERTIFICATION, NOTE_SIZE, CONTENT_WIDTH, CONTENT_WIDTH);
        let rows = certification.len() as f32;
        let top = self
            .engine
            .callout(SIGNATURE_BOX_HEIGHT, Color::RULE, |top| {
                certification
                    .into_iter()
                    .enumerate()
                    .map(|(index, chunk)| {
                        TextLine::placed(
                            MARGIN,
                            CONTENT_WIDTH,
                            top + 10.0 + index as f32 * line_height(NOTE_SIZE),
                            Align::Center,
                            vec![Span::new(chunk, NOTE_SIZE, Color::LABEL)],
                        )
                    })
                    .collect()
            });
        self.engine.move_to(top + 10.0);
        self.engine.move_down(rows + 1.0, NOTE_SIZE);

        let signature = self.text_or_missing(keys::SIGNATURE);
        let signed_on = self.date_or_missing(keys::DATE_SIGN);
        self.field("Signature", &signature);
        self.field("Date", &signed_on);
    }

    fn footer(&mut self, branding: &Branding) {
        let top = PAGE_HEIGHT - FOOTER_OFFSET;
        if self.engine.cursor() > top {
            self.engine.new_page();
        }
        let centered = |offset: f32, text: &str, color: Color| {
            TextLine::placed(
                MARGIN,
                CONTENT_WIDTH,
                top + offset,
                Align::Center,
                vec![Span::new(text, FOOTER_SIZE, color)],
            )
        };
        self.engine.footer(vec![
            centered(0.0, &branding.office, Color::MUTED),
            centered(15.0, &branding.contact_line, Color::MUTED),
            centered(30.0, &branding.website_label, Color::ACCENT).linked(&branding.website_url),
        ]);
    }
}
