//! Calorie calculators.
//!
//! Every per-entry result is rounded to two decimals before it is stored.
//! Daily totals later sum those rounded values.

/// Share of the normal burn rate that applies while moving in microgravity
pub const MICROGRAVITY_CAL_FACTOR: f64 = 0.5;

/// Round to two decimal places, half away from zero
///
/// Values too large to scale are already whole and come back unchanged.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Calories burned by an exercise performed at a fixed rate
pub fn exercise_calories(duration_minutes: f64, calories_per_minute: f64) -> f64 {
    round2(duration_minutes * calories_per_minute)
}

/// Calories burned walking or jogging
///
/// Minutes spent in microgravity burn at `MICROGRAVITY_CAL_FACTOR` of the
/// normal rate. Callers must ensure `microgravity_minutes <= duration_minutes`.
pub fn movement_calories(
    duration_minutes: f64,
    microgravity_minutes: f64,
    calories_per_minute: f64,
) -> f64 {
    let normal_minutes = duration_minutes - microgravity_minutes;
    round2(
        normal_minutes * calories_per_minute
            + microgravity_minutes * calories_per_minute * MICROGRAVITY_CAL_FACTOR,
    )
}
