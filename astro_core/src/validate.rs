//! Parse-and-validate step for user input.
//!
//! Each raw text field goes through exactly one of the `parse_*` helpers,
//! which either yields a typed value or a [`ValidationError`]. The entry
//! forms build on those helpers so every front end rejects the same input
//! with the same message, and nothing is calculated or saved for a form that
//! fails.

use crate::calc::{exercise_calories, movement_calories};
use crate::catalog::RateCatalog;
use crate::error::ValidationError;
use crate::types::{Activity, ExerciseEntry, MealEntry, MovementEntry};
use chrono::NaiveDate;

/// Parse a required text field, trimming whitespace
pub fn parse_text(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value.to_string())
}

/// Parse a finite real number
pub fn parse_number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(ValidationError::NotANumber {
            field,
            value: value.to_string(),
        }),
    }
}

/// Parse a number that must be strictly greater than zero
pub fn parse_positive(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let n = parse_number(field, raw)?;
    if n <= 0.0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(n)
}

/// Parse a number that must be zero or more
pub fn parse_non_negative(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let n = parse_number(field, raw)?;
    if n < 0.0 {
        return Err(ValidationError::Negative { field });
    }
    // Normalise -0.0
    Ok(n.abs())
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let value = raw.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Normalise a user name: trimmed and lowercased, never empty
pub fn normalize_user_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        return Err(ValidationError::EmptyUserName);
    }
    Ok(name)
}

/// Reject a calculated burn that overflowed; it could not be stored as JSON
fn finite_calories(calories: f64) -> Result<f64, ValidationError> {
    if calories.is_finite() {
        Ok(calories)
    } else {
        Err(ValidationError::OutOfRange { field: "Duration" })
    }
}

// ============================================================================
// Entry Forms
// ============================================================================

/// Which exercise is being logged
#[derive(Clone, Debug)]
pub enum ExerciseSelection {
    /// One of the catalog exercises
    Named(String),
    /// A free-form exercise with its own burn rate
    Other {
        name: String,
        calories_per_minute: String,
    },
}

/// Raw exercise form fields
#[derive(Clone, Debug)]
pub struct ExerciseForm {
    pub selection: ExerciseSelection,
    pub duration: String,
}

impl ExerciseForm {
    pub fn validate(&self, catalog: &RateCatalog) -> Result<ExerciseEntry, ValidationError> {
        let duration = parse_positive("Duration", &self.duration)?;

        let (name, rate) = match &self.selection {
            ExerciseSelection::Named(name) => {
                let exercise = catalog
                    .exercise(name)
                    .ok_or_else(|| ValidationError::UnknownExercise(name.trim().to_string()))?;
                (exercise.name.clone(), exercise.calories_per_minute)
            }
            ExerciseSelection::Other {
                name,
                calories_per_minute,
            } => {
                let name = parse_text("Exercise name", name)?;
                let rate = parse_positive("Calories per minute", calories_per_minute)?;
                (name, rate)
            }
        };

        Ok(ExerciseEntry {
            name,
            duration_minutes: duration,
            calories: finite_calories(exercise_calories(duration, rate))?,
        })
    }
}

/// Raw movement form fields
#[derive(Clone, Debug)]
pub struct MovementForm {
    pub activity: String,
    /// Speed tier label; the slowest tier is used when absent
    pub speed: Option<String>,
    pub duration: String,
    pub microgravity: String,
}

impl MovementForm {
    pub fn validate(&self, catalog: &RateCatalog) -> Result<MovementEntry, ValidationError> {
        let activity: Activity = self.activity.parse()?;

        let tier = match self.speed.as_deref() {
            Some(label) if !label.trim().is_empty() => catalog.speed(activity, label),
            _ => catalog.default_speed(activity),
        }
        .ok_or_else(|| ValidationError::UnknownSpeed {
            activity: activity.to_string(),
            label: self.speed.clone().unwrap_or_default(),
        })?;

        let duration = parse_positive("Duration", &self.duration)?;
        let microgravity = parse_non_negative("Microgravity duration", &self.microgravity)?;
        if microgravity > duration {
            return Err(ValidationError::MicrogravityExceedsDuration {
                microgravity,
                duration,
            });
        }

        Ok(MovementEntry {
            activity,
            speed_label: tier.label.clone(),
            duration_minutes: duration,
            microgravity_minutes: microgravity,
            calories: finite_calories(movement_calories(
                duration,
                microgravity,
                tier.calories_per_minute,
            ))?,
        })
    }
}

/// Raw meal form fields
#[derive(Clone, Debug, Default)]
pub struct MealForm {
    pub name: String,
    pub calories: String,
    pub protein: String,
    pub carbs: String,
}

impl MealForm {
    pub fn validate(&self) -> Result<MealEntry, ValidationError> {
        Ok(MealEntry {
            name: parse_text("Meal name", &self.name)?,
            calories: parse_non_negative("Calories", &self.calories)?,
            protein_g: parse_non_negative("Protein", &self.protein)?,
            carbs_g: parse_non_negative("Carbs", &self.carbs)?,
        })
    }
}
