use super::common::*;

use crate::workflows::intake::document::{
    HtmlBackend, PdfBackend, TextBackend, PAGE_HEIGHT, PAGINATION_THRESHOLD,
};
use crate::workflows::intake::submission::keys;
use crate::workflows::intake::{
    DocumentBackend, DocumentRenderer, LayoutBlock, RawSubmission, RenderedDocument,
};

fn render(submission: &RawSubmission) -> RenderedDocument {
    DocumentRenderer::default().render(submission, today())
}

fn field_labels(document: &RenderedDocument) -> Vec<String> {
    document
        .blocks()
        .filter_map(|block| match block {
            LayoutBlock::Field { label, .. } => Some(label.clone()),
            _ => None,
        })
        .collect()
}

fn encoded_text(backend: &dyn DocumentBackend, document: &RenderedDocument) -> String {
    let bytes = backend.encode(document).expect("encode");
    String::from_utf8(bytes).expect("utf-8 output")
}

#[test]
fn sections_follow_the_template_order() {
    let document = render(&submission());
    let titles: Vec<&str> = document
        .pages
        .iter()
        .flat_map(|page| page.section_titles())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Company Information",
            "Project Details",
            "Employment Impact",
            "Capital Investment",
            "Project Timeline",
            "Commitments",
            "Signature",
        ]
    );
}

#[test]
fn capital_investment_starts_a_new_page_past_the_threshold() {
    let document = render(&submission());
    assert_eq!(document.page_count(), 2);
    assert_eq!(document.page_of_section("Employment Impact"), Some(0));
    assert_eq!(document.page_of_section("Capital Investment"), Some(1));

    let last_employment_row = document.pages[0]
        .blocks
        .iter()
        .rev()
        .find_map(|block| match block {
            LayoutBlock::Field { lines, .. } => lines.last().map(|line| line.y + line.height()),
            _ => None,
        })
        .expect("employment rows on the first page");
    assert!(last_employment_row > PAGINATION_THRESHOLD);
}

#[test]
fn footer_sits_on_the_last_page_only() {
    let document = render(&submission());
    let footers: Vec<(usize, &LayoutBlock)> = document
        .pages
        .iter()
        .enumerate()
        .flat_map(|(index, page)| page.blocks.iter().map(move |block| (index, block)))
        .filter(|(_, block)| matches!(block, LayoutBlock::Footer { .. }))
        .collect();

    assert_eq!(footers.len(), 1);
    let (page, footer) = footers[0];
    assert_eq!(page, document.page_count() - 1);

    let lines = footer.lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].y, PAGE_HEIGHT - 80.0);
    assert_eq!(lines[1].y, PAGE_HEIGHT - 65.0);
    assert_eq!(lines[2].link.as_deref(), Some("https://www.pwcded.org"));
}

#[test]
fn identical_inputs_encode_identical_pdfs() {
    let first = PdfBackend
        .encode(&render(&submission()))
        .expect("first pdf");
    let second = PdfBackend
        .encode(&render(&submission()))
        .expect("second pdf");
    assert!(first.starts_with(b"%PDF-"));
    assert_eq!(first, second);
}

#[test]
fn currency_rows_use_grouped_dollars() {
    let document = render(&submission());
    assert_eq!(document.field("Land/Building Purchase"), Some("$900,000"));
    assert_eq!(document.field("Construction/Upfit"), Some("$1,250,000"));
    assert_eq!(
        document.field("Furniture, Fixtures & Equipment"),
        Some("$200,000")
    );

    let total = document
        .blocks()
        .find_map(|block| match block {
            LayoutBlock::Line { line } if line.text().starts_with("TOTAL INVESTMENT") => {
                Some(line.text())
            }
            _ => None,
        })
        .expect("total line");
    assert_eq!(total, "TOTAL INVESTMENT: $2,500,000");
}

#[test]
fn sizes_and_counts_are_labelled() {
    let document = render(&submission());
    assert_eq!(document.field("Site Size"), Some("4.5 acres"));
    assert_eq!(document.field("Building Size"), Some("42,000 sq ft"));
    assert_eq!(document.field("Upfit Size"), Some("12,000 sq ft"));
    assert_eq!(document.field("New Jobs - Year 3"), Some("20"));
    assert_eq!(
        document.field("Contact Person"),
        Some("Jordan Reyes, Director of Operations")
    );
}

#[test]
fn unknown_project_type_reads_not_specified() {
    let raw = submission().with(keys::PROJECT_TYPE, "renovation");
    assert_eq!(render(&raw).field("Project Type"), Some("Not specified"));

    let raw = submission().with(keys::PROJECT_TYPE, "both");
    assert_eq!(
        render(&raw).field("Project Type"),
        Some("New Construction & Upfit")
    );
}

#[test]
fn lease_block_requires_lease_ownership_and_a_term() {
    let owned = render(&submission().with(keys::LEASE_TERM, "10"));
    assert_eq!(owned.field("Lease Term"), None);

    let leased_without_term = render(&submission().with(keys::OWNERSHIP_TYPE, "lease"));
    assert_eq!(leased_without_term.field("Lease Term"), None);

    let leased = render(
        &submission()
            .with(keys::OWNERSHIP_TYPE, "lease")
            .with(keys::LEASE_TERM, "10")
            .with(keys::LEASE_PAYMENTS, "120000")
            .with(keys::LEASE_RATE, "$18/sq ft"),
    );
    assert_eq!(leased.field("Lease Term"), Some("10 years"));
    assert_eq!(leased.field("Annual Lease Payment"), Some("$120,000"));
    assert_eq!(leased.field("Lease Rate"), Some("$18/sq ft"));
}

#[test]
fn callouts_have_fixed_heights() {
    let document = render(&submission());
    let heights: Vec<f32> = document
        .blocks()
        .filter_map(|block| match block {
            LayoutBlock::Callout { frame, .. } => Some(frame.height),
            _ => None,
        })
        .collect();
    assert_eq!(heights, vec![60.0, 80.0]);

    let employment = document
        .blocks()
        .find(|block| matches!(block, LayoutBlock::Callout { .. }))
        .expect("employment callout");
    assert_eq!(
        employment.text(),
        "Total New Jobs: 45\nAverage Annual Wage: $68,000"
    );
}

#[test]
fn dates_print_as_month_day_year() {
    let document = render(&submission());
    assert_eq!(document.field("Site Plan Submittal"), Some("3/1/2026"));
    assert_eq!(document.field("Desired Occupancy Date"), Some("12/1/2026"));
    assert_eq!(document.field("Date"), Some("1/14/2026"));

    let stamped = document.blocks().any(|block| {
        matches!(block, LayoutBlock::Line { line } if line.text() == "Application Date: 1/15/2026")
    });
    assert!(stamped, "application date line missing");
}

#[test]
fn unparseable_dates_are_printed_as_submitted() {
    let raw = submission().with(keys::UPFIT_PLAN_DATE, "after permits clear");
    assert_eq!(
        render(&raw).field("Upfit Plan Submittal"),
        Some("after permits clear")
    );
}

#[test]
fn commitments_render_yes_no_bullets() {
    let document = render(&submission());
    let bullets: Vec<String> = document
        .blocks()
        .filter_map(|block| match block {
            LayoutBlock::Line { line } if line.text().starts_with('\u{2022}') => Some(line.text()),
            _ => None,
        })
        .collect();
    assert_eq!(
        bullets,
        vec![
            "\u{2022} Annual Employment Reports: Yes".to_string(),
            "\u{2022} Public Announcement Agreement: No".to_string(),
        ]
    );
}

#[test]
fn empty_submission_keeps_every_label() {
    let full = render(&submission());
    let empty = render(&RawSubmission::new());

    assert_eq!(field_labels(&empty), field_labels(&full));
    assert_eq!(empty.field("Company Name"), Some("Not provided"));
    assert_eq!(empty.field("Land/Building Purchase"), Some("Not provided"));
    assert_eq!(empty.field("Jobs to be Retained"), Some("Not provided"));
    assert_eq!(empty.field("Signature"), Some("Not provided"));
    PdfBackend.encode(&empty).expect("empty submission still renders");
}

#[test]
fn long_activity_text_flows_across_pages_without_leaving_the_page() {
    let essay = "Precision machining, anodizing and final assembly of widgets. ".repeat(120);
    let document = render(&submission().with(keys::ACTIVITIES, essay));

    let paragraph_pages: Vec<usize> = document
        .pages
        .iter()
        .enumerate()
        .filter(|(_, page)| {
            page.blocks
                .iter()
                .any(|block| matches!(block, LayoutBlock::Paragraph { .. }))
        })
        .map(|(index, _)| index)
        .collect();
    assert!(paragraph_pages.len() > 1, "{paragraph_pages:?}");

    assert_within_margins(&document);
    PdfBackend.encode(&document).expect("long document renders");
}

fn assert_within_margins(document: &RenderedDocument) {
    for page in &document.pages {
        for block in &page.blocks {
            if matches!(block, LayoutBlock::Footer { .. }) {
                continue;
            }
            for line in block.lines() {
                assert!(
                    line.y + line.height() <= PAGE_HEIGHT - 50.0 + 1e-3,
                    "{:?} overflows",
                    line.text()
                );
            }
        }
    }
}

#[test]
fn oversized_rows_continue_on_the_next_page() {
    let address = "Suite ".repeat(2000);
    let raw = submission().with(keys::HQ_ADDRESS, address.as_str());
    let document = render(&raw);

    let address_pages = document
        .pages
        .iter()
        .filter(|page| page.field("Headquarters Address").is_some())
        .count();
    assert!(address_pages > 1, "{address_pages}");
    assert_eq!(document.field("Headquarters Address"), Some(address.as_str()));
    assert_within_margins(&document);

    let bytes = PdfBackend.encode(&document).expect("oversized row still renders");
    assert!(bytes.starts_with(b"%PDF-"));
}

fn employment_bottom(document: &RenderedDocument) -> (usize, f32) {
    document
        .pages
        .iter()
        .enumerate()
        .find_map(|(index, page)| {
            page.blocks.iter().find_map(|block| match block {
                LayoutBlock::Field { label, lines, .. } if label == "Expected New Residents" => {
                    lines.last().map(|line| (index, line.y + line.height()))
                }
                _ => None,
            })
        })
        .expect("employment rows present")
}

#[test]
fn capital_investment_stays_put_when_employment_ends_high_on_a_page() {
    let sentence = "Precision machining, anodizing and final assembly of widgets. ";
    let mut stayed_on_a_later_page = 0;

    for repeat in 1..=160 {
        let raw = submission().with(keys::ACTIVITIES, sentence.repeat(repeat));
        let document = render(&raw);
        let (page, bottom) = employment_bottom(&document);
        let capital = document
            .page_of_section("Capital Investment")
            .expect("capital investment section");

        if bottom > PAGINATION_THRESHOLD {
            assert_eq!(capital, page + 1, "repeat {repeat}: bottom {bottom}");
        } else {
            assert_eq!(capital, page, "repeat {repeat}: bottom {bottom}");
            if page > 0 {
                stayed_on_a_later_page += 1;
            }
        }
    }

    assert!(stayed_on_a_later_page > 0);
}

#[test]
fn html_output_escapes_submitted_text() {
    let raw = submission().with(keys::COMPANY_NAME, "Acme <Labs> & \"Co\"");
    let html = encoded_text(&HtmlBackend, &render(&raw));

    assert!(html.contains("Acme &lt;Labs&gt; &amp; &quot;Co&quot;"));
    assert!(!html.contains("<Labs>"));
    assert!(html.contains("<a href=\"https://www.pwcded.org\">"));
    assert_eq!(html.matches("<section class=\"page\"").count(), 2);
}

#[test]
fn text_output_keeps_rows_and_page_breaks() {
    let text = encoded_text(&TextBackend, &render(&submission()));
    assert!(text.contains("TOTAL INVESTMENT: $2,500,000"));
    assert!(text.contains("Company Name: Acme Widgets Inc"));
    assert!(text.contains(" page 2 "));
    assert!(text.contains("CAPITAL INVESTMENT"));
}

#[test]
fn branding_is_configurable() {
    let mut branding = DocumentRenderer::default().branding().clone();
    branding.organization = "Loudoun County".to_string();
    branding.website_url = "https://biz.loudoun.test".to_string();

    let document = DocumentRenderer::new(branding).render(&submission(), today());
    let title = document
        .blocks()
        .find(|block| matches!(block, LayoutBlock::Title { .. }))
        .expect("title block");
    assert!(title.text().starts_with("Loudoun County\n"));

    let footer = document
        .blocks()
        .find(|block| matches!(block, LayoutBlock::Footer { .. }))
        .expect("footer block");
    assert_eq!(
        footer.lines()[2].link.as_deref(),
        Some("https://biz.loudoun.test")
    );
}
