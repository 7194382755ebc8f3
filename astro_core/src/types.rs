//! Core domain types for the fitness log.
//!
//! The persisted layout is a plain nested mapping:
//! user name -> category -> ISO date -> ordered entries.
//! Field names on disk are kept short (`exercise`, `duration`, `speed`, ...)
//! so existing data files stay readable.

use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Entry Types
// ============================================================================

/// Kind of movement activity
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Activity {
    Walking,
    Jogging,
}

impl Activity {
    pub const ALL: [Activity; 2] = [Activity::Walking, Activity::Jogging];

    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Walking => "Walking",
            Activity::Jogging => "Jogging",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "walking" | "walk" => Ok(Activity::Walking),
            "jogging" | "jog" => Ok(Activity::Jogging),
            _ => Err(ValidationError::UnknownActivity(s.trim().to_string())),
        }
    }
}

/// A logged exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseEntry {
    #[serde(rename = "exercise")]
    pub name: String,
    #[serde(rename = "duration")]
    pub duration_minutes: f64,
    pub calories: f64,
}

/// A logged walk or jog, part of which may be spent in microgravity
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MovementEntry {
    pub activity: Activity,
    #[serde(rename = "speed")]
    pub speed_label: String,
    #[serde(rename = "duration")]
    pub duration_minutes: f64,
    #[serde(rename = "microgravity_duration")]
    pub microgravity_minutes: f64,
    pub calories: f64,
}

/// A logged meal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MealEntry {
    #[serde(rename = "meal")]
    pub name: String,
    pub calories: f64,
    #[serde(rename = "protein")]
    pub protein_g: f64,
    #[serde(rename = "carbs")]
    pub carbs_g: f64,
}

/// Closed set of things that can be logged for a day
#[derive(Clone, Debug, PartialEq)]
pub enum LogEntry {
    Exercise(ExerciseEntry),
    Meal(MealEntry),
    Movement(MovementEntry),
}

impl LogEntry {
    /// Calories burned (exercise, movement) or consumed (meal)
    pub fn calories(&self) -> f64 {
        match self {
            LogEntry::Exercise(e) => e.calories,
            LogEntry::Meal(m) => m.calories,
            LogEntry::Movement(m) => m.calories,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LogEntry::Exercise(_) => "exercise",
            LogEntry::Meal(_) => "meal",
            LogEntry::Movement(_) => "movement",
        }
    }
}

// ============================================================================
// Store Types
// ============================================================================

/// Everything logged by one user, bucketed by category and date
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct UserRecord {
    #[serde(default)]
    pub exercises: BTreeMap<NaiveDate, Vec<ExerciseEntry>>,
    #[serde(default)]
    pub meals: BTreeMap<NaiveDate, Vec<MealEntry>>,
    #[serde(default)]
    pub movements: BTreeMap<NaiveDate, Vec<MovementEntry>>,
}

/// Borrowed view of one day of a user's log
#[derive(Clone, Copy, Debug)]
pub struct DayLog<'a> {
    pub exercises: &'a [ExerciseEntry],
    pub movements: &'a [MovementEntry],
    pub meals: &'a [MealEntry],
}

impl DayLog<'_> {
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty() && self.movements.is_empty() && self.meals.is_empty()
    }
}

impl UserRecord {
    /// Append an entry to the end of the given day's sequence
    pub fn append(&mut self, date: NaiveDate, entry: LogEntry) {
        match entry {
            LogEntry::Exercise(e) => self.exercises.entry(date).or_default().push(e),
            LogEntry::Meal(m) => self.meals.entry(date).or_default().push(m),
            LogEntry::Movement(m) => self.movements.entry(date).or_default().push(m),
        }
    }

    /// Entries for one date; missing categories are empty
    pub fn day(&self, date: NaiveDate) -> DayLog<'_> {
        DayLog {
            exercises: self.exercises.get(&date).map(Vec::as_slice).unwrap_or(&[]),
            movements: self.movements.get(&date).map(Vec::as_slice).unwrap_or(&[]),
            meals: self.meals.get(&date).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Total number of entries across every date and category
    pub fn entry_count(&self) -> usize {
        self.exercises.values().map(Vec::len).sum::<usize>()
            + self.meals.values().map(Vec::len).sum::<usize>()
            + self.movements.values().map(Vec::len).sum::<usize>()
    }
}

/// The full persisted store, keyed by lowercase user name
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct FitnessStore {
    users: BTreeMap<String, UserRecord>,
}

impl FitnessStore {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn user(&self, name: &str) -> Option<&UserRecord> {
        self.users.get(name)
    }

    /// Get a user's record, creating an empty one on first use
    pub fn user_mut(&mut self, name: &str) -> &mut UserRecord {
        self.users.entry(name.to_string()).or_default()
    }

    pub fn user_names(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_append_preserves_order() {
        let mut record = UserRecord::default();
        let day = date("2025-03-01");

        for name in ["Squats", "Plank", "Burpees"] {
            record.append(
                day,
                LogEntry::Exercise(ExerciseEntry {
                    name: name.into(),
                    duration_minutes: 1.0,
                    calories: 1.0,
                }),
            );
        }

        let names: Vec<_> = record.day(day).exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Squats", "Plank", "Burpees"]);
        assert_eq!(record.entry_count(), 3);
    }

    #[test]
    fn test_missing_day_is_empty() {
        let record = UserRecord::default();
        assert!(record.day(date("2025-03-01")).is_empty());
    }

    #[test]
    fn test_activity_parse() {
        assert_eq!("walking".parse::<Activity>().unwrap(), Activity::Walking);
        assert_eq!(" Jogging ".parse::<Activity>().unwrap(), Activity::Jogging);
        assert!(matches!(
            "swimming".parse::<Activity>(),
            Err(ValidationError::UnknownActivity(_))
        ));
    }

    #[test]
    fn test_persisted_field_names() {
        let mut store = FitnessStore::default();
        store.user_mut("ana").append(
            date("2025-03-01"),
            LogEntry::Movement(MovementEntry {
                activity: Activity::Walking,
                speed_label: "Moderate (3 km/h)".into(),
                duration_minutes: 30.0,
                microgravity_minutes: 10.0,
                calories: 100.0,
            }),
        );

        let json = serde_json::to_value(&store).unwrap();
        let entry = &json["ana"]["movements"]["2025-03-01"][0];
        assert_eq!(entry["activity"], "Walking");
        assert_eq!(entry["speed"], "Moderate (3 km/h)");
        assert_eq!(entry["microgravity_duration"], 10.0);
    }

    #[test]
    fn test_record_with_missing_categories_loads() {
        let json = r#"{"ana": {"meals": {"2025-03-01": [
            {"meal": "2 eggs", "calories": 143.0, "protein": 12.56, "carbs": 0.72}
        ]}}}"#;
        let store: FitnessStore = serde_json::from_str(json).unwrap();
        let record = store.user("ana").unwrap();
        assert!(record.exercises.is_empty());
        assert_eq!(record.day(date("2025-03-01")).meals.len(), 1);
    }
}
