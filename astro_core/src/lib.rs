#![forbid(unsafe_code)]

//! Core domain model and business logic for the astronaut fitness tracker.
//!
//! This crate provides:
//! - Domain types (exercise, movement and meal entries, the user store)
//! - Calorie rate catalog and calculators
//! - Input validation
//! - Persistence (JSON store with corruption quarantine, CSV export)
//! - Daily summaries
//! - Nutrition lookup
//! - The session context used by front ends

pub mod types;
pub mod error;
pub mod catalog;
pub mod calc;
pub mod config;
pub mod logging;
pub mod validate;
pub mod store;
pub mod summary;
pub mod nutrition;
pub mod export;
pub mod session;

// Re-export commonly used types
pub use error::{Error, LookupFailure, Result, ValidationError};
pub use types::*;
pub use catalog::{get_default_catalog, RateCatalog};
pub use config::Config;
pub use store::Loaded;
pub use summary::{summarize, DailySummary, NetBalance};
pub use nutrition::{NutritionFacts, NutritionLookup, NutritionixClient};
pub use validate::{ExerciseForm, ExerciseSelection, MealForm, MovementForm};
pub use session::Session;
