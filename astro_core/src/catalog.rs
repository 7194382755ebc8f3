//! Built-in calorie rate tables.
//!
//! Exercise rates are calories per minute for twenty bodyweight exercises.
//! Movement rates are calories per minute for each walking and jogging speed
//! tier.

use crate::types::Activity;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<RateCatalog> = Lazy::new(build_default_catalog);

/// A named exercise with its burn rate
#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseRate {
    pub name: String,
    pub calories_per_minute: f64,
}

/// A speed tier for walking or jogging
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedTier {
    pub label: String,
    pub calories_per_minute: f64,
}

impl SpeedTier {
    /// The tier name without the speed annotation, e.g. "Moderate"
    pub fn short_name(&self) -> &str {
        self.label
            .split_once(" (")
            .map(|(name, _)| name)
            .unwrap_or(&self.label)
    }
}

/// Rate tables used by the calorie calculators
#[derive(Clone, Debug)]
pub struct RateCatalog {
    pub exercises: Vec<ExerciseRate>,
    pub walking: Vec<SpeedTier>,
    pub jogging: Vec<SpeedTier>,
}

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static RateCatalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog
///
/// **Note**: For production use, prefer `get_default_catalog()`.
pub fn build_default_catalog() -> RateCatalog {
    let exercises = [
        ("Jumping Jacks", 8.0),
        ("Push-ups", 7.0),
        ("Sit-ups", 6.0),
        ("Pull-ups", 9.0),
        ("Squats", 6.0),
        ("Lunges", 6.0),
        ("Plank", 4.0),
        ("Mountain Climbers", 8.0),
        ("High Knees", 8.0),
        ("Wall Sit", 5.0),
        ("Crunches", 6.0),
        ("Leg Raises", 5.0),
        ("Glute Bridges", 5.0),
        ("Arm Circles", 3.0),
        ("Calf Raises", 4.0),
        ("Step-ups", 6.0),
        ("Chair Dips", 5.0),
        ("Side Plank", 4.0),
        ("Russian Twists", 6.0),
        ("Burpees", 10.0),
    ];

    let walking = [
        ("Very Low (1 km/h)", 2.0),
        ("Low (2 km/h)", 3.0),
        ("Moderate (3 km/h)", 4.0),
        ("High (4 km/h)", 5.0),
        ("Very High (5 km/h)", 6.0),
    ];

    let jogging = [
        ("Low (6 km/h)", 7.0),
        ("Moderate (7 km/h)", 8.0),
        ("High (8 km/h)", 9.0),
    ];

    let tiers = |table: &[(&str, f64)]| -> Vec<SpeedTier> {
        table
            .iter()
            .map(|(label, rate)| SpeedTier {
                label: (*label).into(),
                calories_per_minute: *rate,
            })
            .collect()
    };

    RateCatalog {
        exercises: exercises
            .iter()
            .map(|(name, rate)| ExerciseRate {
                name: (*name).into(),
                calories_per_minute: *rate,
            })
            .collect(),
        walking: tiers(&walking),
        jogging: tiers(&jogging),
    }
}

impl RateCatalog {
    /// Find an exercise by name, ignoring case
    pub fn exercise(&self, name: &str) -> Option<&ExerciseRate> {
        let name = name.trim();
        self.exercises
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Speed tiers for an activity, slowest first
    pub fn speed_tiers(&self, activity: Activity) -> &[SpeedTier] {
        match activity {
            Activity::Walking => &self.walking,
            Activity::Jogging => &self.jogging,
        }
    }

    /// The tier selected when none is given
    pub fn default_speed(&self, activity: Activity) -> Option<&SpeedTier> {
        self.speed_tiers(activity).first()
    }

    /// Find a tier by its full label or its short name ("moderate"), ignoring case
    pub fn speed(&self, activity: Activity, label: &str) -> Option<&SpeedTier> {
        let label = label.trim();
        let tiers = self.speed_tiers(activity);
        tiers
            .iter()
            .find(|t| t.label.eq_ignore_ascii_case(label))
            .or_else(|| tiers.iter().find(|t| t.short_name().eq_ignore_ascii_case(label)))
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut seen = HashSet::new();
        for exercise in &self.exercises {
            if !seen.insert(exercise.name.to_lowercase()) {
                errors.push(format!("Duplicate exercise '{}'", exercise.name));
            }
            if !is_positive(exercise.calories_per_minute) {
                errors.push(format!(
                    "Exercise '{}' has non-positive rate {}",
                    exercise.name, exercise.calories_per_minute
                ));
            }
        }

        for activity in Activity::ALL {
            let tiers = self.speed_tiers(activity);
            if tiers.is_empty() {
                errors.push(format!("No speed tiers defined for {}", activity));
            }
            for tier in tiers {
                if !is_positive(tier.calories_per_minute) {
                    errors.push(format!(
                        "{} tier '{}' has non-positive rate {}",
                        activity, tier.label, tier.calories_per_minute
                    ));
                }
            }
        }

        errors
    }
}

fn is_positive(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(errors.is_empty(), "Catalog errors: {:?}", errors);
        assert_eq!(catalog.exercises.len(), 20);
        assert_eq!(catalog.walking.len(), 5);
        assert_eq!(catalog.jogging.len(), 3);
    }

    #[test]
    fn test_exercise_lookup_ignores_case() {
        let catalog = get_default_catalog();
        let pushups = catalog.exercise("push-UPS").unwrap();
        assert_eq!(pushups.name, "Push-ups");
        assert_eq!(pushups.calories_per_minute, 7.0);
        assert!(catalog.exercise("Yoga").is_none());
    }

    #[test]
    fn test_speed_lookup_by_label_and_short_name() {
        let catalog = get_default_catalog();

        let full = catalog.speed(Activity::Walking, "Moderate (3 km/h)").unwrap();
        assert_eq!(full.calories_per_minute, 4.0);

        let short = catalog.speed(Activity::Jogging, "moderate").unwrap();
        assert_eq!(short.label, "Moderate (7 km/h)");
        assert_eq!(short.calories_per_minute, 8.0);

        // "low" must not match "Very Low"
        let low = catalog.speed(Activity::Walking, "low").unwrap();
        assert_eq!(low.calories_per_minute, 3.0);

        assert!(catalog.speed(Activity::Jogging, "Very High (5 km/h)").is_none());
    }

    #[test]
    fn test_default_speed_is_first_tier() {
        let catalog = get_default_catalog();
        assert_eq!(
            catalog.default_speed(Activity::Walking).unwrap().label,
            "Very Low (1 km/h)"
        );
        assert_eq!(
            catalog.default_speed(Activity::Jogging).unwrap().label,
            "Low (6 km/h)"
        );
    }

    #[test]
    fn test_validate_flags_bad_rates() {
        let mut catalog = build_default_catalog();
        catalog.exercises.push(ExerciseRate {
            name: "push-ups".into(),
            calories_per_minute: 0.0,
        });
        catalog.jogging.clear();

        let errors = catalog.validate();
        assert_eq!(errors.len(), 3);
    }
}
