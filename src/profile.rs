//! Profile detail tables for a resolved stakeholder row.
//!
//! The dashboard shows a fixed set of field groups split across two columns.
//! Rendering is pure: exactly the fields given, in the given order. Absent
//! values become a placeholder dash; labels prefixed "linkedin"
//! (case-insensitive) with a present value become link cells.

use crate::dataset::StakeholderRow;
use serde::Serialize;

pub const PLACEHOLDER: &str = "-";

type FieldFn = for<'a> fn(&'a StakeholderRow) -> Option<&'a str>;

pub struct FieldSpec {
    pub label: &'static str,
    pub get: FieldFn,
}

/// Which dashboard column the group renders in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Left,
    Right,
}

pub struct FieldGroup {
    pub title: &'static str,
    pub color: &'static str,
    pub column: Column,
    pub fields: Vec<FieldSpec>,
}

/// One rendered label/value pair. `link` is set for hyperlink-bearing fields;
/// the `value` then carries the display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailCell {
    pub label: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailTable {
    pub title: &'static str,
    pub color: &'static str,
    pub column: Column,
    pub rows: Vec<DetailCell>,
}

const GROUP_COLOR: &str = "#cce5ff";

/// The static group definitions, in render order.
pub fn field_groups() -> Vec<FieldGroup> {
    vec![
        FieldGroup {
            title: "Lead Identification & Contact Details",
            color: GROUP_COLOR,
            column: Column::Left,
            fields: vec![
                FieldSpec { label: "Business Group", get: |r| r.business_group.as_deref() },
                FieldSpec { label: "Lead Priority", get: |r| r.lead_priority.as_deref() },
                FieldSpec { label: "Client Name", get: |r| Some(r.client_name.as_str()) },
                FieldSpec { label: "Designation", get: |r| r.designation.as_deref() },
                FieldSpec { label: "Location (from teams)", get: |r| r.location_teams.as_deref() },
                FieldSpec { label: "Email address", get: |r| r.email.as_deref() },
                FieldSpec { label: "LinkedIn URL", get: |r| r.linkedin_url.as_deref() },
            ],
        },
        FieldGroup {
            title: "Engagement & Outreach Strategy",
            color: GROUP_COLOR,
            column: Column::Left,
            fields: vec![
                FieldSpec {
                    label: "Scope of work/Priorities (internal research)",
                    get: |r| r.scope_of_work.as_deref(),
                },
                FieldSpec {
                    label: "Additional Research (External)",
                    get: |r| r.additional_research.as_deref(),
                },
                FieldSpec { label: "Mutual LinkedIn Connects", get: |r| r.linkedin_connects.as_deref() },
                FieldSpec { label: "Introduction Path", get: |r| r.introduction_path.as_deref() },
                FieldSpec { label: "Pursued in past", get: |r| r.pursued_in_past.as_deref() },
                FieldSpec {
                    label: "Relationship Strength",
                    get: |r| r.relationship_strength.as_deref(),
                },
                FieldSpec { label: "Lead Potential ESS", get: |r| r.lead_potential_ess.as_deref() },
                FieldSpec { label: "Lead Potential DAC", get: |r| r.lead_potential_dac.as_deref() },
                FieldSpec {
                    label: "If Yes, background/context ?",
                    get: |r| r.background_context.as_deref(),
                },
                FieldSpec { label: "Comments", get: |r| r.comments.as_deref() },
            ],
        },
        FieldGroup {
            title: "Company & Department Info",
            color: GROUP_COLOR,
            column: Column::Right,
            fields: vec![
                FieldSpec { label: "Business Segment", get: |r| r.business_segment.as_deref() },
                FieldSpec { label: "Working Group", get: |r| r.working_group.as_deref() },
                FieldSpec { label: "Business Functions", get: |r| r.business_functions.as_deref() },
                FieldSpec { label: "1st Degree Manager", get: |r| r.manager1.as_deref() },
                FieldSpec { label: "2nd Degree Manager", get: |r| r.manager2.as_deref() },
            ],
        },
        FieldGroup {
            title: "Organizational Hierarchy",
            color: GROUP_COLOR,
            column: Column::Right,
            fields: vec![
                FieldSpec { label: "1st Degree Manager", get: |r| r.manager1.as_deref() },
                FieldSpec { label: "2nd Degree Manager", get: |r| r.manager2.as_deref() },
            ],
        },
        FieldGroup {
            title: "Lead Status & Tracking",
            color: GROUP_COLOR,
            column: Column::Right,
            fields: vec![
                FieldSpec { label: "Who will reach out ?", get: |r| r.reach_out_owner.as_deref() },
                FieldSpec {
                    label: "Lever for Reach out(s) ready ?",
                    get: |r| r.reach_out_lever.as_deref(),
                },
                FieldSpec { label: "Lead Status", get: |r| r.lead_status.as_deref() },
            ],
        },
        FieldGroup {
            title: "Expertise & Experience",
            color: GROUP_COLOR,
            column: Column::Right,
            fields: vec![
                FieldSpec {
                    label: "Designation Seniority",
                    get: |r| r.designation_seniority.as_deref(),
                },
                FieldSpec {
                    label: "Location (from LinkedIn)",
                    get: |r| r.location_linkedin.as_deref(),
                },
            ],
        },
        FieldGroup {
            title: "Contractor Information",
            color: GROUP_COLOR,
            column: Column::Right,
            fields: vec![
                FieldSpec { label: "Contractor Count", get: |r| r.contractor_count.as_deref() },
                FieldSpec { label: "Vendor Company Name", get: |r| r.vendor_company.as_deref() },
            ],
        },
    ]
}

/// True when the label marks a hyperlink-bearing field.
fn is_link_label(label: &str) -> bool {
    label.to_lowercase().starts_with("linkedin")
}

/// Render all field groups for one resolved row.
pub fn detail_tables(row: &StakeholderRow) -> Vec<DetailTable> {
    field_groups()
        .into_iter()
        .map(|group| DetailTable {
            title: group.title,
            color: group.color,
            column: group.column,
            rows: group
                .fields
                .iter()
                .map(|spec| render_cell(spec, row))
                .collect(),
        })
        .collect()
}

fn render_cell(spec: &FieldSpec, row: &StakeholderRow) -> DetailCell {
    match (spec.get)(row) {
        Some(value) if is_link_label(spec.label) => DetailCell {
            label: spec.label,
            // Display the person's name rather than the raw URL.
            value: row.client_name.clone(),
            link: Some(value.to_string()),
        },
        Some(value) => DetailCell {
            label: spec.label,
            value: value.to_string(),
            link: None,
        },
        None => DetailCell {
            label: spec.label,
            value: PLACEHOLDER.to_string(),
            link: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_support::row;

    #[test]
    fn test_absent_values_render_placeholder() {
        let tables = detail_tables(&row("Alice", None, None));
        let contact = &tables[0];

        assert_eq!(contact.title, "Lead Identification & Contact Details");
        assert_eq!(contact.rows[0].value, PLACEHOLDER); // Business Group
        assert_eq!(contact.rows[2].value, "Alice"); // Client Name always present
    }

    #[test]
    fn test_linkedin_url_becomes_link_cell() {
        let mut person = row("Alice", None, None);
        person.linkedin_url = Some("https://linkedin.com/in/alice".to_string());

        let tables = detail_tables(&person);
        let cell = tables[0]
            .rows
            .iter()
            .find(|c| c.label == "LinkedIn URL")
            .unwrap();

        assert_eq!(cell.value, "Alice");
        assert_eq!(cell.link.as_deref(), Some("https://linkedin.com/in/alice"));
    }

    #[test]
    fn test_absent_linkedin_url_is_plain_placeholder() {
        let tables = detail_tables(&row("Alice", None, None));
        let cell = tables[0]
            .rows
            .iter()
            .find(|c| c.label == "LinkedIn URL")
            .unwrap();

        assert_eq!(cell.value, PLACEHOLDER);
        assert!(cell.link.is_none());
    }

    #[test]
    fn test_non_link_fields_never_carry_links() {
        let mut person = row("Alice", Some("Bob"), None);
        person.linkedin_connects = Some("3".to_string());

        let tables = detail_tables(&person);
        for table in &tables {
            for cell in &table.rows {
                if cell.label != "LinkedIn URL" {
                    assert!(cell.link.is_none(), "unexpected link on {}", cell.label);
                }
            }
        }
    }

    #[test]
    fn test_group_layout() {
        let tables = detail_tables(&row("Alice", None, None));
        assert_eq!(tables.len(), 7);
        assert_eq!(
            tables.iter().filter(|t| t.column == Column::Left).count(),
            2
        );
        // Manager fields appear in the hierarchy group in order.
        let hierarchy = tables
            .iter()
            .find(|t| t.title == "Organizational Hierarchy")
            .unwrap();
        let labels: Vec<_> = hierarchy.rows.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["1st Degree Manager", "2nd Degree Manager"]);
    }
}
