//! CSV export of a user's full log.
//!
//! One row per entry, ordered by date, then category (exercises, movements,
//! meals), then the order entries were logged in.

use crate::types::UserRecord;
use crate::Result;
use chrono::NaiveDate;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: NaiveDate,
    kind: &'static str,
    name: String,
    duration: Option<f64>,
    microgravity: Option<f64>,
    speed: Option<String>,
    calories: f64,
    protein: Option<f64>,
    carbs: Option<f64>,
}

fn collect_rows(record: &UserRecord) -> Vec<CsvRow> {
    let mut rows = Vec::with_capacity(record.entry_count());

    for (date, entries) in &record.exercises {
        rows.extend(entries.iter().map(|e| CsvRow {
            date: *date,
            kind: "exercise",
            name: e.name.clone(),
            duration: Some(e.duration_minutes),
            microgravity: None,
            speed: None,
            calories: e.calories,
            protein: None,
            carbs: None,
        }));
    }

    for (date, entries) in &record.movements {
        rows.extend(entries.iter().map(|m| CsvRow {
            date: *date,
            kind: "movement",
            name: m.activity.to_string(),
            duration: Some(m.duration_minutes),
            microgravity: Some(m.microgravity_minutes),
            speed: Some(m.speed_label.clone()),
            calories: m.calories,
            protein: None,
            carbs: None,
        }));
    }

    for (date, entries) in &record.meals {
        rows.extend(entries.iter().map(|m| CsvRow {
            date: *date,
            kind: "meal",
            name: m.name.clone(),
            duration: None,
            microgravity: None,
            speed: None,
            calories: m.calories,
            protein: Some(m.protein_g),
            carbs: Some(m.carbs_g),
        }));
    }

    // Stable sort keeps category order and logging order within a date
    rows.sort_by_key(|row| row.date);
    rows
}

/// Write every entry of `record` to a CSV file, replacing it
///
/// Returns the number of rows written.
pub fn export_user_csv(record: &UserRecord, csv_path: &Path) -> Result<usize> {
    // Ensure parent directory exists
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rows = collect_rows(record);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(csv_path)?;

    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    tracing::info!("Exported {} entries to {:?}", rows.len(), csv_path);
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Activity, ExerciseEntry, LogEntry, MealEntry, MovementEntry};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn sample_record() -> UserRecord {
        let mut record = UserRecord::default();
        record.append(
            date(2),
            LogEntry::Meal(MealEntry {
                name: "Oatmeal, with raisins".into(),
                calories: 300.0,
                protein_g: 10.0,
                carbs_g: 54.0,
            }),
        );
        record.append(
            date(2),
            LogEntry::Exercise(ExerciseEntry {
                name: "Squats".into(),
                duration_minutes: 5.0,
                calories: 30.0,
            }),
        );
        record.append(
            date(1),
            LogEntry::Movement(MovementEntry {
                activity: Activity::Jogging,
                speed_label: "Low (6 km/h)".into(),
                duration_minutes: 10.0,
                microgravity_minutes: 0.0,
                calories: 70.0,
            }),
        );
        record
    }

    #[test]
    fn test_rows_ordered_by_date_then_category() {
        let rows = collect_rows(&sample_record());
        let order: Vec<_> = rows.iter().map(|r| (r.date, r.kind)).collect();
        assert_eq!(
            order,
            vec![
                (date(1), "movement"),
                (date(2), "exercise"),
                (date(2), "meal"),
            ]
        );
    }

    #[test]
    fn test_export_writes_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("out/ana.csv");

        let count = export_user_csv(&sample_record(), &csv_path).unwrap();
        assert_eq!(count, 3);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["date", "kind", "name", "duration", "microgravity", "speed", "calories", "protein", "carbs"]
        );

        let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][0], "2025-03-01");
        assert_eq!(&records[0][5], "Low (6 km/h)");
        assert_eq!(&records[2][2], "Oatmeal, with raisins");
        assert_eq!(&records[2][7], "10.0");
        assert_eq!(&records[1][7], "");
    }

    #[test]
    fn test_export_empty_record() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("empty.csv");

        let count = export_user_csv(&UserRecord::default(), &csv_path).unwrap();
        assert_eq!(count, 0);
        assert!(csv_path.exists());
    }
}
