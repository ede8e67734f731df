use super::service::BusinessRow;

const HEADERS: [&str; 12] = [
    "business_id",
    "business_name",
    "representative",
    "barangay",
    "municipality",
    "province",
    "street",
    "house_no",
    "dti_expiry",
    "sec_expiry",
    "cda_expiry",
    "compliance",
];

/// Serialize listing rows to CSV, header first, dates in ISO form.
pub fn to_csv(rows: &[BusinessRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for row in rows {
        writer.write_record([
            row.business_id.0.as_str(),
            row.business_name.as_str(),
            row.representative.as_str(),
            row.barangay.as_str(),
            row.municipality.as_str(),
            row.province.as_str(),
            row.street.as_str(),
            row.house_no.as_str(),
            &date_cell(row.dti_expiry),
            &date_cell(row.sec_expiry),
            &date_cell(row.cda_expiry),
            row.compliance.label(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|error| error.into_error().into())
}

fn date_cell(date: Option<chrono::NaiveDate>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::compliance::ComplianceStatus;
    use crate::directory::domain::BusinessId;
    use chrono::NaiveDate;

    fn sample_row() -> BusinessRow {
        BusinessRow {
            business_id: BusinessId("BIZ001".to_string()),
            business_name: "Leganes General Store".to_string(),
            representative: "Juan Dela Cruz".to_string(),
            barangay: "Poblacion".to_string(),
            municipality: "Leganes".to_string(),
            province: "Iloilo".to_string(),
            street: "Rizal Street".to_string(),
            house_no: "123".to_string(),
            dti_expiry: NaiveDate::from_ymd_opt(2024, 12, 31),
            sec_expiry: None,
            cda_expiry: NaiveDate::from_ymd_opt(2024, 12, 31),
            compliance: ComplianceStatus::Pending,
        }
    }

    #[test]
    fn csv_contains_header_and_one_line_per_row() {
        let bytes = to_csv(&[sample_row()]).expect("csv renders");
        let text = String::from_utf8(bytes).expect("utf8");
        let mut lines = text.lines();

        let header = lines.next().expect("header row");
        assert!(header.starts_with("business_id,business_name"));
        assert!(header.ends_with("compliance"));

        let row = lines.next().expect("data row");
        assert!(row.contains("BIZ001"));
        assert!(row.contains("2024-12-31"));
        assert!(row.ends_with("pending"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn missing_dates_render_as_empty_cells() {
        let bytes = to_csv(&[sample_row()]).expect("csv renders");
        let text = String::from_utf8(bytes).expect("utf8");
        let row = text.lines().nth(1).expect("data row");
        assert!(row.contains(",2024-12-31,,2024-12-31,"));
    }
}
