//! Composition: turns a candidate record into the sidebar and main-flow blocks.
//!
//! Field presence rules live here. A missing field contributes nothing, no
//! placeholder. The three sidebar headings after "Contact Details" are always
//! emitted, whether or not the record carries the matching field.

use crate::assets::HeaderImage;
use crate::record::{as_sequence, joined_text, text_items, CandidateRecord, FieldValue};
use crate::render::blocks::{
    Block, ImageBlock, TextBlock, TextStyle, ACCENT, BODY_TEXT, LINK_TEXT, MUTED_TEXT,
    SIDEBAR_TEXT,
};

const HEADER_IMAGE_WIDTH: f32 = 120.0;

/// Sidebar content, composed once per document and redrawn on every page.
pub fn compose_sidebar(record: &CandidateRecord) -> Vec<TextBlock> {
    let heading = TextStyle::heading(SIDEBAR_TEXT);
    let body = TextStyle::body(SIDEBAR_TEXT);
    let mut blocks = vec![TextBlock::new("Contact Details", heading).with_space_before(0.0)];

    for phone in text_items(record.get("Phone Number")) {
        blocks.push(TextBlock::new(phone, body));
    }
    for email in text_items(record.get("Email")) {
        blocks.push(TextBlock::new(email, body));
    }

    blocks.push(TextBlock::new("Education", heading));
    for entry in as_sequence(record.get("Education")) {
        if let Some(line) = education_line(entry) {
            blocks.push(TextBlock::new(line, body));
        }
    }

    blocks.push(TextBlock::new("Skills", heading));
    for skill in text_items(record.get("Skills")) {
        blocks.push(TextBlock::new(format!("• {skill}"), body));
    }

    blocks.push(TextBlock::new("Certifications", heading));
    for entry in as_sequence(record.get("Certifications")) {
        if let Some(line) = certification_line(entry) {
            blocks.push(TextBlock::new(line, body));
        }
    }

    blocks
}

/// `• {Degree} from {Institution} ({Graduation Date})[ - {Percentage}]`.
/// A bare string entry is printed as a plain bullet.
fn education_line(entry: &FieldValue) -> Option<String> {
    if let FieldValue::Bag(_) = entry {
        let degree = entry.text("Degree").unwrap_or_default();
        let institution = entry.text("Institution").unwrap_or_default();
        let graduated = entry.text("Graduation Date").unwrap_or_default();
        let mut line = format!("• {degree} from {institution} ({graduated})");
        if let Some(percentage) = entry.non_empty("Percentage") {
            line.push_str(&format!(" - {percentage}"));
        }
        Some(line)
    } else {
        plain_bullet(entry)
    }
}

/// `• {Certification Name}[ by {Issuing Organization}][ ({Date})]`.
fn certification_line(entry: &FieldValue) -> Option<String> {
    if let FieldValue::Bag(_) = entry {
        let name = entry.text("Certification Name").unwrap_or_default();
        let mut line = format!("• {name}");
        if let Some(issuer) = entry.non_empty("Issuing Organization") {
            line.push_str(&format!(" by {issuer}"));
        }
        if let Some(date) = entry.non_empty("Date") {
            line.push_str(&format!(" ({date})"));
        }
        Some(line)
    } else {
        plain_bullet(entry)
    }
}

fn plain_bullet(entry: &FieldValue) -> Option<String> {
    entry
        .as_text()
        .filter(|s| !s.trim().is_empty())
        .map(|s| format!("• {s}"))
}

/// Main-column content in template order.
pub fn compose_main_flow(record: &CandidateRecord, header: Option<&HeaderImage>) -> Vec<Block> {
    let heading = TextStyle::heading(BODY_TEXT);
    let body = TextStyle::body(BODY_TEXT);
    let mut blocks = Vec::new();

    if let Some(image) = header {
        blocks.push(Block::Image(ImageBlock::scaled(image, HEADER_IMAGE_WIDTH)));
    }

    if let Some(url) = record.non_empty("LinkedIn URL") {
        blocks.push(Block::Text(
            TextBlock::new("LinkedIn: ", TextStyle::entry(BODY_TEXT)).with_space_before(10.0),
        ));
        blocks.push(Block::Text(TextBlock::new(
            url,
            TextStyle::body(LINK_TEXT).underlined(),
        )));
    }

    if let Some(name) = record.non_empty("Name") {
        blocks.push(Block::Text(
            TextBlock::new(name, TextStyle::title(BODY_TEXT)).with_space_before(10.0),
        ));
    }

    let summary = record
        .first_present(&["Professional Summary", "Summary"])
        .and_then(FieldValue::as_text)
        .filter(|s| !s.is_empty());
    if let Some(summary) = summary {
        blocks.push(Block::Text(TextBlock::new("Professional Summary", heading)));
        blocks.push(Block::Text(TextBlock::new(summary, body)));
    }

    if let Some(years) = record.non_empty("Total Year of Experience") {
        blocks.push(Block::Text(
            TextBlock::new("Total Years of Experience", heading).with_space_before(10.0),
        ));
        blocks.push(Block::Text(TextBlock::new(format!("• {years} Years"), body)));
    }

    if let Some(experience) = record.get("Experience") {
        blocks.push(Block::Text(TextBlock::new("Experience", heading)));
        for (i, entry) in as_sequence(Some(experience)).into_iter().enumerate() {
            compose_experience_entry(&mut blocks, i + 1, entry);
        }
    }

    if let Some(projects) = record.first_present(&["Projects", "Project Details"]) {
        blocks.push(Block::Text(TextBlock::new("Project Details", heading)));
        for (i, entry) in as_sequence(Some(projects)).into_iter().enumerate() {
            compose_project_entry(&mut blocks, i + 1, entry);
        }
    }

    blocks
}

fn compose_experience_entry(blocks: &mut Vec<Block>, number: usize, entry: &FieldValue) {
    let body = TextStyle::body(BODY_TEXT);

    if let Some(title) = entry.non_empty("Job Title") {
        blocks.push(Block::Text(
            TextBlock::new(format!("{number}. {title}"), TextStyle::entry(BODY_TEXT))
                .with_space_before(5.0),
        ));
    }
    if let Some(company) = entry.non_empty("Company") {
        blocks.push(Block::Text(TextBlock::new(company, TextStyle::body(ACCENT))));
    }
    if let Some(dates) = entry.non_empty("Dates") {
        blocks.push(Block::Text(TextBlock::new(dates, TextStyle::body(MUTED_TEXT))));
    }
    if let Some(duration) = entry.non_empty("Duration") {
        blocks.push(Block::Text(TextBlock::new(duration, TextStyle::body(MUTED_TEXT))));
    }
    for responsibility in text_items(entry.get("Responsibilities")) {
        blocks.push(Block::Text(TextBlock::new(format!("• {responsibility}"), body)));
    }
}

fn compose_project_entry(blocks: &mut Vec<Block>, number: usize, entry: &FieldValue) {
    let body = TextStyle::body(BODY_TEXT);

    if let Some(name) = entry.non_empty("Project Name") {
        blocks.push(Block::Text(
            TextBlock::new(format!("{number}. {name}"), TextStyle::entry(BODY_TEXT))
                .with_space_before(5.0),
        ));
    }
    if let Some(description) = entry.non_empty("Description") {
        blocks.push(Block::Text(TextBlock::new(format!("• {description}"), body)));
    }
    if let Some(technologies) = joined_text(entry.get("Technologies Used"), ", ") {
        blocks.push(Block::Text(TextBlock::new(
            format!("Technologies Used: {technologies}"),
            body,
        )));
    }
    if let Some(roles) = joined_text(entry.get("Role"), ", ") {
        blocks.push(Block::Text(TextBlock::new(format!("Role: {roles}"), body)));
    }
}
