//! Daily aggregation of a user's log.
//!
//! Totals add up the per-entry calorie values exactly as they were stored,
//! which were already rounded to two decimals. Only the net balance is
//! rounded again.

use crate::calc::round2;
use crate::types::{ExerciseEntry, MealEntry, MovementEntry, UserRecord};
use chrono::NaiveDate;
use std::fmt::{self, Write};

/// Reference daily protein intake for an average adult, in grams
pub const REFERENCE_PROTEIN_G: f64 = 50.0;

/// Reference daily carbohydrate intake for an average adult, in grams
pub const REFERENCE_CARBS_G: f64 = 300.0;

/// Whether the day ended with more calories in than out
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NetBalance {
    /// Consumed at least as much as burned; holds the surplus
    Gain(f64),
    /// Burned more than consumed; holds the deficit as a positive number
    Loss(f64),
}

impl NetBalance {
    fn from_net(net: f64) -> Self {
        if net >= 0.0 {
            NetBalance::Gain(net)
        } else {
            NetBalance::Loss(-net)
        }
    }
}

impl fmt::Display for NetBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetBalance::Gain(v) => write!(f, "Net Calorie Gain: {} cal", format_amount(*v)),
            NetBalance::Loss(v) => write!(f, "Net Calorie Loss: {} cal", format_amount(*v)),
        }
    }
}

/// Aggregated totals for one user on one date
#[derive(Clone, Debug, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub exercises: Vec<ExerciseEntry>,
    pub movements: Vec<MovementEntry>,
    pub meals: Vec<MealEntry>,
    pub total_burned: f64,
    pub total_consumed: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    /// `round2(total_consumed - total_burned)`
    pub net: f64,
}

/// Fold one day of a user's log into totals
///
/// Returns `None` when nothing was logged that day in any category.
pub fn summarize(record: &UserRecord, date: NaiveDate) -> Option<DailySummary> {
    let day = record.day(date);
    if day.is_empty() {
        return None;
    }

    let mut total_burned = 0.0;
    for e in day.exercises {
        total_burned += e.calories;
    }
    for m in day.movements {
        total_burned += m.calories;
    }

    let mut total_consumed = 0.0;
    let mut total_protein = 0.0;
    let mut total_carbs = 0.0;
    for m in day.meals {
        total_consumed += m.calories;
        total_protein += m.protein_g;
        total_carbs += m.carbs_g;
    }

    Some(DailySummary {
        date,
        exercises: day.exercises.to_vec(),
        movements: day.movements.to_vec(),
        meals: day.meals.to_vec(),
        total_burned,
        total_consumed,
        total_protein,
        total_carbs,
        net: round2(total_consumed - total_burned),
    })
}

impl DailySummary {
    pub fn balance(&self) -> NetBalance {
        NetBalance::from_net(self.net)
    }

    /// Plain-text report of the day
    pub fn render(&self, display_name: &str) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_report(&mut out, display_name);
        out
    }

    fn write_report(&self, out: &mut String, display_name: &str) -> fmt::Result {
        writeln!(out, "Summary for {} on {}:", display_name, self.date)?;
        writeln!(out)?;

        if !self.exercises.is_empty() {
            writeln!(out, "Exercises:")?;
            for e in &self.exercises {
                writeln!(
                    out,
                    "- {} for {} min, {} cal burned.",
                    e.name,
                    format_amount(e.duration_minutes),
                    format_amount(e.calories)
                )?;
            }
            writeln!(out)?;
        }

        if !self.movements.is_empty() {
            writeln!(out, "Movements:")?;
            for m in &self.movements {
                writeln!(
                    out,
                    "- {} at {} speed for {} min, Microgravity: {} min, {} cal burned.",
                    m.activity,
                    m.speed_label,
                    format_amount(m.duration_minutes),
                    format_amount(m.microgravity_minutes),
                    format_amount(m.calories)
                )?;
            }
            writeln!(out)?;
        }

        if !self.meals.is_empty() {
            writeln!(out, "Meals:")?;
            for m in &self.meals {
                writeln!(
                    out,
                    "- {}: {} cal, {}g protein, {}g carbs",
                    m.name,
                    format_amount(m.calories),
                    format_amount(m.protein_g),
                    format_amount(m.carbs_g)
                )?;
            }
            writeln!(out)?;
        }

        writeln!(out, "---- Totals ----")?;
        writeln!(
            out,
            "Total Calories Consumed: {} cal",
            format_amount(self.total_consumed)
        )?;
        writeln!(
            out,
            "Total Protein: {} g (Expected Daily Protein Intake for an average adult: {}g)",
            format_amount(self.total_protein),
            REFERENCE_PROTEIN_G
        )?;
        writeln!(
            out,
            "Total Carbs: {} g (Expected Daily Carbs Intake for an average adult: {}g)",
            format_amount(self.total_carbs),
            REFERENCE_CARBS_G
        )?;
        writeln!(
            out,
            "Total Calories Burned: {} cal",
            format_amount(self.total_burned)
        )?;
        writeln!(out, "{}", self.balance())
    }
}

/// Format a quantity for display: at most two decimals, at least one
pub fn format_amount(value: f64) -> String {
    let rounded = round2(value);
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        format!("{}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Activity, LogEntry};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn sample_record() -> UserRecord {
        let mut record = UserRecord::default();
        record.append(
            day(),
            LogEntry::Exercise(ExerciseEntry {
                name: "Push-ups".into(),
                duration_minutes: 10.0,
                calories: 70.0,
            }),
        );
        record.append(
            day(),
            LogEntry::Movement(MovementEntry {
                activity: Activity::Walking,
                speed_label: "Moderate (3 km/h)".into(),
                duration_minutes: 30.0,
                microgravity_minutes: 10.0,
                calories: 100.0,
            }),
        );
        record.append(
            day(),
            LogEntry::Meal(MealEntry {
                name: "Tortilla wrap".into(),
                calories: 200.0,
                protein_g: 8.0,
                carbs_g: 30.5,
            }),
        );
        record
    }

    #[test]
    fn test_empty_day_is_no_data() {
        let record = UserRecord::default();
        assert!(summarize(&record, day()).is_none());

        // Data on another day does not count
        let other = day().succ_opt().unwrap();
        assert!(summarize(&sample_record(), other).is_none());
    }

    #[test]
    fn test_totals_and_gain() {
        let summary = summarize(&sample_record(), day()).unwrap();
        assert_eq!(summary.total_consumed, 200.0);
        assert_eq!(summary.total_burned, 170.0);
        assert_eq!(summary.total_protein, 8.0);
        assert_eq!(summary.total_carbs, 30.5);
        assert_eq!(summary.net, 30.0);
        assert_eq!(summary.balance(), NetBalance::Gain(30.0));
    }

    #[test]
    fn test_loss_is_reported_as_absolute_value() {
        let mut record = sample_record();
        record.append(
            day(),
            LogEntry::Exercise(ExerciseEntry {
                name: "Burpees".into(),
                duration_minutes: 5.0,
                calories: 50.25,
            }),
        );
        let summary = summarize(&record, day()).unwrap();
        assert_eq!(summary.net, -20.25);
        assert_eq!(summary.balance(), NetBalance::Loss(20.25));
        assert!(summary
            .render("Ana")
            .contains("Net Calorie Loss: 20.25 cal"));
    }

    #[test]
    fn test_zero_net_is_gain() {
        let mut record = UserRecord::default();
        record.append(
            day(),
            LogEntry::Meal(MealEntry {
                name: "Water".into(),
                calories: 0.0,
                protein_g: 0.0,
                carbs_g: 0.0,
            }),
        );
        let summary = summarize(&record, day()).unwrap();
        assert_eq!(summary.balance(), NetBalance::Gain(0.0));
    }

    #[test]
    fn test_render_sections() {
        let report = summarize(&sample_record(), day()).unwrap().render("Ana");
        assert!(report.starts_with("Summary for Ana on 2025-03-01:\n"));
        assert!(report.contains("Exercises:\n- Push-ups for 10.0 min, 70.0 cal burned.\n"));
        assert!(report.contains(
            "- Walking at Moderate (3 km/h) speed for 30.0 min, Microgravity: 10.0 min, 100.0 cal burned."
        ));
        assert!(report.contains("- Tortilla wrap: 200.0 cal, 8.0g protein, 30.5g carbs"));
        assert!(report.contains("Total Calories Burned: 170.0 cal"));
        assert!(report.ends_with("Net Calorie Gain: 30.0 cal\n"));
    }

    #[test]
    fn test_render_skips_empty_sections() {
        let mut record = UserRecord::default();
        record.append(
            day(),
            LogEntry::Meal(MealEntry {
                name: "Soup".into(),
                calories: 120.0,
                protein_g: 4.0,
                carbs_g: 15.0,
            }),
        );
        let report = summarize(&record, day()).unwrap().render("Ana");
        assert!(!report.contains("Exercises:"));
        assert!(!report.contains("Movements:"));
        assert!(report.contains("Meals:"));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(70.0), "70.0");
        assert_eq!(format_amount(12.5), "12.5");
        assert_eq!(format_amount(0.1 + 0.2), "0.3");
        assert_eq!(format_amount(3.14159), "3.14");
    }
}
