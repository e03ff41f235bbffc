//! CSV record input and annotation output

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};

use crate::error::{Result, VerdinError};
use crate::models::{Annotation, Record};

/// Read observation records from a CSV file.
///
/// Expects a header row with `event_id`, `date`, `latitude`, `longitude`
/// columns (extra columns are ignored); dates are ISO `YYYY-MM-DD`.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<Record>().enumerate() {
        let record = row.map_err(|e| VerdinError::FormatInvalid {
            format: "CSV".to_string(),
            reason: format!("row {}: {}", index + 1, e),
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Write the annotated table as CSV.
///
/// Absent values become empty cells.
pub fn write_annotations(path: &Path, rows: &[Annotation]) -> Result<usize> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().from_writer(file);

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| VerdinError::Serialization(format!("CSV write error: {}", e)))?;
    }
    writer.flush()?;

    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_read_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(
            &path,
            "event_id,date,latitude,longitude\n\
             obs-1,2015-06-15,47.25,-121.5\n\
             obs-2,2013-01-02,58.9,-150.0\n",
        )
        .unwrap();

        let records = read_records(&path).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "obs-1");
        assert_eq!(records[0].date, date(2015, 6, 15));
        assert_eq!(records[0].lat, 47.25);
        assert_eq!(records[0].lng, -121.5);
        assert_eq!(records[1].id, "obs-2");
    }

    #[test]
    fn test_read_records_ignores_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(
            &path,
            "event_id,species,date,latitude,longitude,observer\n\
             obs-1,Calypte anna,2015-06-15, 47.25 ,-121.5,jt\n",
        )
        .unwrap();

        let records = read_records(&path).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].lat, 47.25);
    }

    #[test]
    fn test_read_records_bad_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(
            &path,
            "event_id,date,latitude,longitude\n\
             obs-1,15/06/2015,47.25,-121.5\n",
        )
        .unwrap();

        let result = read_records(&path);
        assert!(matches!(result, Err(VerdinError::FormatInvalid { ref format, .. }) if format == "CSV"));
    }

    #[test]
    fn test_write_annotations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.csv");

        let rows = vec![
            Annotation {
                id: "obs-1".to_string(),
                date: date(2015, 6, 15),
                lat: 47.25,
                lng: -121.5,
                value: Some(0.4125),
            },
            Annotation {
                id: "obs-2".to_string(),
                date: date(2015, 6, 15),
                lat: 40.0,
                lng: -150.0,
                value: None,
            },
        ];

        let written = write_annotations(&path, &rows).unwrap();
        assert_eq!(written, 2);

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("event_id,date,latitude,longitude,evi"));
        assert_eq!(lines.next(), Some("obs-1,2015-06-15,47.25,-121.5,0.4125"));
        // Absent value is an empty cell
        assert_eq!(lines.next(), Some("obs-2,2015-06-15,40.0,-150.0,"));
    }

    #[test]
    fn test_written_table_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.csv");

        let rows = vec![Annotation {
            id: "obs-9".to_string(),
            date: date(2014, 11, 3),
            lat: 51.5,
            lng: -128.25,
            value: Some(0.25),
        }];
        write_annotations(&path, &rows).unwrap();

        // The output columns are a superset of the record columns
        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "obs-9");
        assert_eq!(records[0].date, date(2014, 11, 3));
    }
}
