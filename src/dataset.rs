//! Typed stakeholder dataset ingested from one selected worksheet.
//!
//! The schema is fixed: every column below must exist as a header (matched
//! case-insensitively, trimmed) or ingestion fails with the full list of
//! missing columns. Cell values themselves stay optional — an empty or
//! whitespace cell becomes `None`.

use crate::error::AppError;
use crate::sheet_parser::RawSheet;
use serde::Serialize;

/// Canonical column headers of the stakeholder workbook.
pub mod columns {
    pub const CLIENT_NAME: &str = "Client Name";
    pub const MANAGER_1: &str = "1st degree Manager";
    pub const MANAGER_2: &str = "2nd Degree Manager";
    pub const BUSINESS_GROUP: &str = "Business Group";
    pub const LEAD_PRIORITY: &str = "Lead Priority";
    pub const DESIGNATION: &str = "Designation";
    pub const LOCATION_TEAMS: &str = "Location (from teams)";
    pub const EMAIL: &str = "Email address";
    pub const LINKEDIN_URL: &str = "LinkedIn URL";
    pub const SCOPE_OF_WORK: &str = "Scope of work/Priorities (internal research)";
    pub const ADDITIONAL_RESEARCH: &str = "Additional Research (External)";
    pub const LINKEDIN_CONNECTS: &str = "LinkedIn Connects";
    pub const INTRODUCTION_PATH: &str = "Introduction Path";
    pub const PURSUED_IN_PAST: &str = "Pursued in past";
    pub const RELATIONSHIP_STRENGTH: &str = "Relationship Strength";
    pub const LEAD_STATUS: &str = "Lead Status";
    pub const LEAD_POTENTIAL_ESS: &str = "Lead Potential ESS";
    pub const LEAD_POTENTIAL_DAC: &str = "Lead Potential DAC";
    pub const BACKGROUND_CONTEXT: &str = "If Yes, background/context ?";
    pub const COMMENTS: &str = "Comments";
    pub const BUSINESS_SEGMENT: &str = "Business Segment";
    pub const WORKING_GROUP: &str = "Working Group";
    pub const BUSINESS_FUNCTIONS: &str = "Business Functions";
    pub const REACH_OUT_OWNER: &str = "Who will reach out ?";
    pub const REACH_OUT_LEVER: &str = "Lever for Reach out(s) ready ?";
    pub const DESIGNATION_SENIORITY: &str = "Designation Seniority";
    pub const LOCATION_LINKEDIN: &str = "Location (from LinkedIn)";
    pub const CONTRACTOR_COUNT: &str = "Contractor Count";
    pub const VENDOR_COMPANY: &str = "Vendor Company Name";

    /// Every required header, in schema order.
    pub const ALL: &[&str] = &[
        CLIENT_NAME,
        MANAGER_1,
        MANAGER_2,
        BUSINESS_GROUP,
        LEAD_PRIORITY,
        DESIGNATION,
        LOCATION_TEAMS,
        EMAIL,
        LINKEDIN_URL,
        SCOPE_OF_WORK,
        ADDITIONAL_RESEARCH,
        LINKEDIN_CONNECTS,
        INTRODUCTION_PATH,
        PURSUED_IN_PAST,
        RELATIONSHIP_STRENGTH,
        LEAD_STATUS,
        LEAD_POTENTIAL_ESS,
        LEAD_POTENTIAL_DAC,
        BACKGROUND_CONTEXT,
        COMMENTS,
        BUSINESS_SEGMENT,
        WORKING_GROUP,
        BUSINESS_FUNCTIONS,
        REACH_OUT_OWNER,
        REACH_OUT_LEVER,
        DESIGNATION_SENIORITY,
        LOCATION_LINKEDIN,
        CONTRACTOR_COUNT,
        VENDOR_COMPANY,
    ];
}

/// One stakeholder record. `client_name` is the identity key; `manager1` and
/// `manager2` reference other rows' identities by value, resolved by equality
/// at hierarchy-build time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StakeholderRow {
    pub client_name: String,
    pub manager1: Option<String>,
    pub manager2: Option<String>,
    pub business_group: Option<String>,
    pub lead_priority: Option<String>,
    pub designation: Option<String>,
    pub location_teams: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub scope_of_work: Option<String>,
    pub additional_research: Option<String>,
    pub linkedin_connects: Option<String>,
    pub introduction_path: Option<String>,
    pub pursued_in_past: Option<String>,
    pub relationship_strength: Option<String>,
    pub lead_status: Option<String>,
    pub lead_potential_ess: Option<String>,
    pub lead_potential_dac: Option<String>,
    pub background_context: Option<String>,
    pub comments: Option<String>,
    pub business_segment: Option<String>,
    pub working_group: Option<String>,
    pub business_functions: Option<String>,
    pub reach_out_owner: Option<String>,
    pub reach_out_lever: Option<String>,
    pub designation_seniority: Option<String>,
    pub location_linkedin: Option<String>,
    pub contractor_count: Option<String>,
    pub vendor_company: Option<String>,
}

/// The canonical dataset for one selected sheet. Read-only after ingestion.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub sheet_name: String,
    pub rows: Vec<StakeholderRow>,
    /// Rows dropped at ingestion because the identity cell was empty.
    pub dropped_rows: usize,
}

/// Resolves header names to column indices, collecting every miss so the
/// error can name all absent columns at once.
struct HeaderMap<'a> {
    headers: &'a [String],
    missing: Vec<String>,
}

impl<'a> HeaderMap<'a> {
    fn new(headers: &'a [String]) -> Self {
        Self {
            headers,
            missing: Vec::new(),
        }
    }

    fn require(&mut self, name: &str) -> usize {
        match self
            .headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
        {
            Some(idx) => idx,
            None => {
                self.missing.push(name.to_string());
                usize::MAX
            }
        }
    }
}

/// Trimmed cell value at `idx`, `None` when empty or out of range
/// (short rows are legal in flexible CSV input).
fn cell(values: &[String], idx: usize) -> Option<String> {
    let v = values.get(idx)?.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}

impl Dataset {
    /// Ingest a raw sheet into the typed dataset.
    ///
    /// Identity uniqueness is not enforced; duplicate identities resolve to
    /// the earliest row (see [`Dataset::resolve`]).
    pub fn ingest(sheet: &RawSheet) -> Result<Dataset, AppError> {
        use columns::*;

        let mut map = HeaderMap::new(&sheet.headers);
        let client_name = map.require(CLIENT_NAME);
        let manager1 = map.require(MANAGER_1);
        let manager2 = map.require(MANAGER_2);
        let business_group = map.require(BUSINESS_GROUP);
        let lead_priority = map.require(LEAD_PRIORITY);
        let designation = map.require(DESIGNATION);
        let location_teams = map.require(LOCATION_TEAMS);
        let email = map.require(EMAIL);
        let linkedin_url = map.require(LINKEDIN_URL);
        let scope_of_work = map.require(SCOPE_OF_WORK);
        let additional_research = map.require(ADDITIONAL_RESEARCH);
        let linkedin_connects = map.require(LINKEDIN_CONNECTS);
        let introduction_path = map.require(INTRODUCTION_PATH);
        let pursued_in_past = map.require(PURSUED_IN_PAST);
        let relationship_strength = map.require(RELATIONSHIP_STRENGTH);
        let lead_status = map.require(LEAD_STATUS);
        let lead_potential_ess = map.require(LEAD_POTENTIAL_ESS);
        let lead_potential_dac = map.require(LEAD_POTENTIAL_DAC);
        let background_context = map.require(BACKGROUND_CONTEXT);
        let comments = map.require(COMMENTS);
        let business_segment = map.require(BUSINESS_SEGMENT);
        let working_group = map.require(WORKING_GROUP);
        let business_functions = map.require(BUSINESS_FUNCTIONS);
        let reach_out_owner = map.require(REACH_OUT_OWNER);
        let reach_out_lever = map.require(REACH_OUT_LEVER);
        let designation_seniority = map.require(DESIGNATION_SENIORITY);
        let location_linkedin = map.require(LOCATION_LINKEDIN);
        let contractor_count = map.require(CONTRACTOR_COUNT);
        let vendor_company = map.require(VENDOR_COMPANY);

        if !map.missing.is_empty() {
            return Err(AppError::MissingColumns {
                sheet: sheet.name.clone(),
                columns: map.missing,
            });
        }

        let mut rows = Vec::with_capacity(sheet.rows.len());
        let mut dropped_rows = 0usize;

        for values in &sheet.rows {
            let Some(identity) = cell(values, client_name) else {
                dropped_rows += 1;
                continue;
            };

            rows.push(StakeholderRow {
                client_name: identity,
                manager1: cell(values, manager1),
                manager2: cell(values, manager2),
                business_group: cell(values, business_group),
                lead_priority: cell(values, lead_priority),
                designation: cell(values, designation),
                location_teams: cell(values, location_teams),
                email: cell(values, email),
                linkedin_url: cell(values, linkedin_url),
                scope_of_work: cell(values, scope_of_work),
                additional_research: cell(values, additional_research),
                linkedin_connects: cell(values, linkedin_connects),
                introduction_path: cell(values, introduction_path),
                pursued_in_past: cell(values, pursued_in_past),
                relationship_strength: cell(values, relationship_strength),
                lead_status: cell(values, lead_status),
                lead_potential_ess: cell(values, lead_potential_ess),
                lead_potential_dac: cell(values, lead_potential_dac),
                background_context: cell(values, background_context),
                comments: cell(values, comments),
                business_segment: cell(values, business_segment),
                working_group: cell(values, working_group),
                business_functions: cell(values, business_functions),
                reach_out_owner: cell(values, reach_out_owner),
                reach_out_lever: cell(values, reach_out_lever),
                designation_seniority: cell(values, designation_seniority),
                location_linkedin: cell(values, location_linkedin),
                contractor_count: cell(values, contractor_count),
                vendor_company: cell(values, vendor_company),
            });
        }

        tracing::info!(
            "Ingested sheet '{}': {} rows ({} dropped for missing identity)",
            sheet.name,
            rows.len(),
            dropped_rows
        );

        Ok(Dataset {
            sheet_name: sheet.name.clone(),
            rows,
            dropped_rows,
        })
    }

    /// First row in sheet order whose identity equals `identity`.
    /// Always resolved against the full dataset, never a filtered view.
    pub fn resolve(&self, identity: &str) -> Option<&StakeholderRow> {
        self.rows.iter().find(|r| r.client_name == identity)
    }

    /// All rows whose first-level manager equals `identity`, in sheet order.
    pub fn direct_reports(&self, identity: &str) -> Vec<&StakeholderRow> {
        self.rows
            .iter()
            .filter(|r| r.manager1.as_deref() == Some(identity))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Bare row with just the hierarchy fields set.
    pub(crate) fn row(name: &str, mgr1: Option<&str>, mgr2: Option<&str>) -> StakeholderRow {
        StakeholderRow {
            client_name: name.to_string(),
            manager1: mgr1.map(str::to_string),
            manager2: mgr2.map(str::to_string),
            ..Default::default()
        }
    }

    pub(crate) fn dataset(rows: Vec<StakeholderRow>) -> Dataset {
        Dataset {
            sheet_name: "test".to_string(),
            rows,
            dropped_rows: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet_parser::RawSheet;

    fn schema_headers() -> Vec<String> {
        columns::ALL.iter().map(|s| s.to_string()).collect()
    }

    /// Row aligned with `schema_headers()`, first three cells filled.
    fn raw_row(name: &str, mgr1: &str, mgr2: &str) -> Vec<String> {
        let mut row = vec![String::new(); schema_headers().len()];
        row[0] = name.to_string();
        row[1] = mgr1.to_string();
        row[2] = mgr2.to_string();
        row
    }

    fn sheet(rows: Vec<Vec<String>>) -> RawSheet {
        RawSheet {
            name: "Q3".to_string(),
            headers: schema_headers(),
            rows,
        }
    }

    #[test]
    fn test_ingest_basic() {
        let ds = Dataset::ingest(&sheet(vec![
            raw_row("Alice", "Bob", "Carol"),
            raw_row("Bob", "Carol", ""),
        ]))
        .unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0].client_name, "Alice");
        assert_eq!(ds.rows[0].manager1.as_deref(), Some("Bob"));
        assert_eq!(ds.rows[1].manager2, None);
        assert_eq!(ds.dropped_rows, 0);
    }

    #[test]
    fn test_ingest_drops_rows_without_identity() {
        let ds = Dataset::ingest(&sheet(vec![
            raw_row("Alice", "", ""),
            raw_row("", "Bob", ""),
            raw_row("   ", "Bob", ""),
        ]))
        .unwrap();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows, 2);
    }

    #[test]
    fn test_ingest_missing_columns_lists_all() {
        let mut headers = schema_headers();
        headers.retain(|h| h != columns::CLIENT_NAME && h != columns::COMMENTS);
        let raw = RawSheet {
            name: "Q3".to_string(),
            headers,
            rows: vec![vec!["x".to_string()]],
        };

        match Dataset::ingest(&raw) {
            Err(AppError::MissingColumns { sheet, columns }) => {
                assert_eq!(sheet, "Q3");
                assert_eq!(
                    columns,
                    vec!["Client Name".to_string(), "Comments".to_string()]
                );
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_header_match_is_case_insensitive() {
        let headers: Vec<String> = schema_headers()
            .iter()
            .map(|h| h.to_uppercase())
            .collect();
        let raw = RawSheet {
            name: "Q3".to_string(),
            headers,
            rows: vec![raw_row("Alice", "", "")],
        };
        assert!(Dataset::ingest(&raw).is_ok());
    }

    #[test]
    fn test_resolve_first_match_in_sheet_order() {
        let mut first = raw_row("Alice", "Bob", "");
        first[5] = "VP".to_string(); // Designation
        let ds = Dataset::ingest(&sheet(vec![first, raw_row("Alice", "Carol", "")])).unwrap();

        let row = ds.resolve("Alice").unwrap();
        assert_eq!(row.manager1.as_deref(), Some("Bob"));
        assert_eq!(row.designation.as_deref(), Some("VP"));
        assert!(ds.resolve("Nobody").is_none());
    }

    #[test]
    fn test_direct_reports() {
        let ds = Dataset::ingest(&sheet(vec![
            raw_row("Alice", "Bob", ""),
            raw_row("Carol", "Bob", ""),
            raw_row("Dave", "Alice", ""),
        ]))
        .unwrap();

        let reports = ds.direct_reports("Bob");
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].client_name, "Alice");
        assert_eq!(reports[1].client_name, "Carol");
    }
}
