use serde::{Deserialize, Serialize};

use super::service::BusinessRow;

const DEFAULT_PAGE_SIZE: usize = 10;

/// Sortable listing columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    BusinessName,
    Representative,
    Municipality,
    Barangay,
    Compliance,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "business_name" | "name" => Some(Self::BusinessName),
            "representative" | "owner" => Some(Self::Representative),
            "municipality" => Some(Self::Municipality),
            "barangay" => Some(Self::Barangay),
            "compliance" => Some(Self::Compliance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" => Self::Desc,
            _ => Self::Asc,
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Asc
    }
}

/// Search/sort/paginate parameters for the listing table.
#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    pub search: Option<String>,
    pub sort_key: Option<SortKey>,
    pub sort_direction: SortDirection,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl TableQuery {
    /// Same search and ordering, but a single page holding every row.
    /// Exports use this so pagination never truncates a download.
    pub fn without_pagination(mut self) -> Self {
        self.page = Some(1);
        self.page_size = Some(usize::MAX);
        self
    }
}

/// One page of listing rows plus the pagination envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub rows: Vec<BusinessRow>,
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
}

/// Apply a table query over already-filtered rows.
///
/// Search matches case-insensitively across every displayed column; sorting
/// is stable; pages are 1-based and clamp rather than error.
pub fn apply(rows: Vec<BusinessRow>, query: &TableQuery) -> Page {
    let mut rows = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => {
            let needle = term.to_lowercase();
            rows.into_iter()
                .filter(|row| row_matches(row, &needle))
                .collect()
        }
        _ => rows,
    };

    if let Some(key) = query.sort_key {
        rows.sort_by(|a, b| {
            let ordering = match key {
                SortKey::BusinessName => compare_text(&a.business_name, &b.business_name),
                SortKey::Representative => compare_text(&a.representative, &b.representative),
                SortKey::Municipality => compare_text(&a.municipality, &b.municipality),
                SortKey::Barangay => compare_text(&a.barangay, &b.barangay),
                SortKey::Compliance => a.compliance.label().cmp(b.compliance.label()),
            };
            match query.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let total_rows = rows.len();
    let total_pages = total_rows.div_ceil(page_size).max(1);
    let page = query.page.unwrap_or(1).clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let rows = rows
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect::<Vec<_>>();

    Page {
        rows,
        page,
        page_size,
        total_rows,
        total_pages,
    }
}

fn row_matches(row: &BusinessRow, needle: &str) -> bool {
    let haystacks = [
        row.business_id.0.as_str(),
        row.business_name.as_str(),
        row.representative.as_str(),
        row.barangay.as_str(),
        row.municipality.as_str(),
        row.province.as_str(),
        row.street.as_str(),
        row.house_no.as_str(),
    ];
    haystacks
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(needle))
        || row.compliance.label().contains(needle)
}

fn compare_text(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::compliance::ComplianceStatus;
    use crate::directory::domain::BusinessId;

    fn row(id: &str, name: &str, municipality: &str, status: ComplianceStatus) -> BusinessRow {
        BusinessRow {
            business_id: BusinessId(id.to_string()),
            business_name: name.to_string(),
            representative: format!("{name} Owner"),
            barangay: "Poblacion".to_string(),
            municipality: municipality.to_string(),
            province: "Iloilo".to_string(),
            street: "Rizal Street".to_string(),
            house_no: "1".to_string(),
            dti_expiry: None,
            sec_expiry: None,
            cda_expiry: None,
            compliance: status,
        }
    }

    fn sample_rows() -> Vec<BusinessRow> {
        vec![
            row("BIZ001", "Napnud Agri Supply", "Leganes", ComplianceStatus::Compliant),
            row("BIZ002", "Cagamutan Hardware", "Leganes", ComplianceStatus::Noncompliant),
            row("BIZ003", "leganes general store", "Zarraga", ComplianceStatus::Pending),
        ]
    }

    #[test]
    fn search_is_case_insensitive_across_columns() {
        let page = apply(
            sample_rows(),
            &TableQuery {
                search: Some("LEGANES".to_string()),
                ..TableQuery::default()
            },
        );
        // Matches the two Leganes municipalities plus the lowercase name.
        assert_eq!(page.total_rows, 3);

        let page = apply(
            sample_rows(),
            &TableQuery {
                search: Some("hardware".to_string()),
                ..TableQuery::default()
            },
        );
        assert_eq!(page.total_rows, 1);
        assert_eq!(page.rows[0].business_id.0, "BIZ002");
    }

    #[test]
    fn sorting_by_name_ignores_case_and_reverses() {
        let query = TableQuery {
            sort_key: Some(SortKey::BusinessName),
            ..TableQuery::default()
        };
        let page = apply(sample_rows(), &query);
        let names: Vec<&str> = page.rows.iter().map(|r| r.business_name.as_str()).collect();
        assert_eq!(
            names,
            ["Cagamutan Hardware", "leganes general store", "Napnud Agri Supply"]
        );

        let query = TableQuery {
            sort_key: Some(SortKey::BusinessName),
            sort_direction: SortDirection::Desc,
            ..TableQuery::default()
        };
        let page = apply(sample_rows(), &query);
        assert_eq!(page.rows[0].business_name, "Napnud Agri Supply");
    }

    #[test]
    fn pagination_clamps_out_of_range_pages() {
        let query = TableQuery {
            page: Some(99),
            page_size: Some(2),
            ..TableQuery::default()
        };
        let page = apply(sample_rows(), &query);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 2);
        assert_eq!(page.rows.len(), 1);
    }

    #[test]
    fn empty_result_still_reports_one_page() {
        let query = TableQuery {
            search: Some("nothing-matches".to_string()),
            ..TableQuery::default()
        };
        let page = apply(sample_rows(), &query);
        assert_eq!(page.total_rows, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
    }
}
