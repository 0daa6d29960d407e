//! CSV export of homogeneous record lists.
//!
//! Header row comes from the record type's field names; every value is
//! double-quoted with `""` escaping so commas, quotes, and newlines
//! survive a round-trip. Filenames follow `<prefix>_<ISO-date>.csv`.

use crate::alert::Alert;
use crate::format;
use crate::sensor;
use crate::series::Reading;
use crate::types::Timestamp;

/// A record type that can be flattened into one CSV row.
pub trait CsvRecord {
    /// Column names, in output order.
    fn headers() -> &'static [&'static str];
    /// Field values for this record, aligned with [`headers`](Self::headers).
    fn fields(&self) -> Vec<String>;
}

/// A rendered export ready to hand to the download layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Serialize records to CSV text.
pub fn to_csv<R: CsvRecord>(records: &[R]) -> String {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(R::headers().join(","));
    for record in records {
        let values: Vec<String> = record.fields().iter().map(|v| quote(v)).collect();
        rows.push(values.join(","));
    }
    rows.join("\n")
}

/// `<prefix>_<ISO-date>.csv`.
pub fn export_filename(prefix: &str, date: Timestamp) -> String {
    format!("{prefix}_{}.csv", format::iso_date(date))
}

/// Serialize records and name the file after the given date.
pub fn export<R: CsvRecord>(prefix: &str, date: Timestamp, records: &[R]) -> CsvExport {
    CsvExport {
        filename: export_filename(prefix, date),
        content: to_csv(records),
    }
}

/// One monitoring-table row in an export.
#[derive(Debug, Clone)]
pub struct ReadingRow {
    pub timestamp: Timestamp,
    pub sensor_id: String,
    pub value: f64,
    pub unit: String,
}

impl From<&Reading> for ReadingRow {
    fn from(r: &Reading) -> Self {
        Self {
            timestamp: r.timestamp,
            sensor_id: r.sensor_id.clone(),
            value: r.value,
            unit: r.unit.clone(),
        }
    }
}

impl CsvRecord for ReadingRow {
    fn headers() -> &'static [&'static str] {
        &["Timestamp", "Sensor", "Value", "Unit"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.timestamp.to_rfc3339(),
            self.sensor_id.clone(),
            format::format_number(self.value, 2),
            self.unit.clone(),
        ]
    }
}

impl CsvRecord for Alert {
    fn headers() -> &'static [&'static str] {
        &["Date/Heure", "Capteur", "Type", "Message", "Sévérité"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            format::format_datetime(self.timestamp),
            sensor::label(&self.sensor_id).to_string(),
            self.kind.clone(),
            self.message.clone(),
            self.severity.css_class().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    struct Row {
        name: String,
        note: String,
    }

    impl CsvRecord for Row {
        fn headers() -> &'static [&'static str] {
            &["Name", "Note"]
        }

        fn fields(&self) -> Vec<String> {
            vec![self.name.clone(), self.note.clone()]
        }
    }

    /// Minimal parser for quoted CSV, used to check the round-trip.
    fn parse(content: &str) -> Vec<Vec<(String, String)>> {
        let mut chars = content.chars().peekable();
        let mut rows: Vec<Vec<String>> = vec![Vec::new()];
        let mut field = String::new();
        let mut in_quotes = false;

        while let Some(c) = chars.next() {
            if in_quotes {
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    field.push(c);
                }
            } else {
                match c {
                    '"' => in_quotes = true,
                    ',' => {
                        rows.last_mut().unwrap().push(std::mem::take(&mut field));
                    }
                    '\n' => {
                        rows.last_mut().unwrap().push(std::mem::take(&mut field));
                        rows.push(Vec::new());
                    }
                    _ => field.push(c),
                }
            }
        }
        rows.last_mut().unwrap().push(field);

        let headers = rows.remove(0);
        rows.into_iter()
            .map(|row| headers.iter().cloned().zip(row).collect())
            .collect()
    }

    #[test]
    fn round_trip_with_awkward_values() {
        let records = vec![
            Row {
                name: "plain".into(),
                note: "nothing special".into(),
            },
            Row {
                name: "comma, inside".into(),
                note: "he said \"hi\"".into(),
            },
            Row {
                name: "multi\nline".into(),
                note: String::new(),
            },
        ];

        let parsed = parse(&to_csv(&records));
        assert_eq!(parsed.len(), 3);
        for (record, row) in records.iter().zip(&parsed) {
            assert_eq!(row[0], ("Name".to_string(), record.name.clone()));
            assert_eq!(row[1], ("Note".to_string(), record.note.clone()));
        }
    }

    #[test]
    fn header_row_from_record_type() {
        let csv = to_csv::<Row>(&[]);
        assert_eq!(csv, "Name,Note");
    }

    #[test]
    fn filename_pattern() {
        let date = Utc.with_ymd_and_hms(2026, 8, 28, 9, 0, 0).unwrap();
        assert_eq!(export_filename("alertes", date), "alertes_2026-08-28.csv");
    }

    #[test]
    fn reading_rows_render_label_free_ids() {
        let row = ReadingRow {
            timestamp: Utc.with_ymd_and_hms(2026, 8, 28, 9, 0, 0).unwrap(),
            sensor_id: "ph".into(),
            value: 6.789,
            unit: "pH".into(),
        };
        assert_eq!(row.fields()[2], "6.79");

        let export = export("monitoring", row.timestamp, &[row]);
        assert_eq!(export.filename, "monitoring_2026-08-28.csv");
        assert!(export.content.starts_with("Timestamp,Sensor,Value,Unit\n"));
    }
}
