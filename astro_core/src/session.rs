//! Session context for one run of the application.
//!
//! A [`Session`] owns the loaded store, remembers where it came from and
//! which user is active. Every user-facing operation goes through it; logging
//! an entry validates the form, appends the entry for the given date and
//! writes the whole store back before returning.

use crate::catalog::RateCatalog;
use crate::nutrition::{NutritionFacts, NutritionLookup};
use crate::store::Loaded;
use crate::summary::{summarize, DailySummary};
use crate::types::{ExerciseEntry, LogEntry, MealEntry, MovementEntry, UserRecord};
use crate::validate::{normalize_user_name, parse_date, ExerciseForm, MealForm, MovementForm};
use crate::{Error, FitnessStore, Result};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Title-case a stored (lowercase) user name for display
pub fn display_name(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct Session<'c> {
    path: PathBuf,
    store: FitnessStore,
    catalog: &'c RateCatalog,
    user: Option<String>,
    corruption: Option<Error>,
}

impl<'c> Session<'c> {
    /// Load the store at `path` and start a session with no active user
    ///
    /// A corrupt store file does not fail the call; the notice is kept and
    /// can be taken with [`Session::take_corruption_notice`].
    pub fn open(path: impl Into<PathBuf>, catalog: &'c RateCatalog) -> Result<Self> {
        let path = path.into();
        let Loaded { store, corruption } = FitnessStore::load(&path)?;
        Ok(Self {
            path,
            store,
            catalog,
            user: None,
            corruption,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &FitnessStore {
        &self.store
    }

    pub fn catalog(&self) -> &RateCatalog {
        self.catalog
    }

    /// The data-corruption notice from loading, if any; returned once
    pub fn take_corruption_notice(&mut self) -> Option<Error> {
        self.corruption.take()
    }

    /// Make `raw_name` the active user, creating an empty record if new
    pub fn select_user(&mut self, raw_name: &str) -> Result<&str> {
        let name = normalize_user_name(raw_name)?;
        self.store.user_mut(&name);
        tracing::debug!("Active user is now {:?}", name);
        Ok(self.user.insert(name).as_str())
    }

    pub fn active_user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Active user's name in title case
    pub fn display_name(&self) -> Option<String> {
        self.user.as_deref().map(display_name)
    }

    /// The active user's record
    pub fn record(&self) -> Result<&UserRecord> {
        let name = self.user.as_deref().ok_or(Error::NoActiveUser)?;
        self.store.user(name).ok_or(Error::NoActiveUser)
    }

    /// Append an entry for the active user and persist the store
    ///
    /// The in-memory store only changes once the file has been written, so a
    /// failed save leaves the session as it was.
    pub fn record_entry(&mut self, date: NaiveDate, entry: LogEntry) -> Result<()> {
        let name = self.user.as_deref().ok_or(Error::NoActiveUser)?;
        tracing::info!(
            "Logging {} for {:?} on {} ({} cal)",
            entry.kind(),
            name,
            date,
            entry.calories()
        );

        let mut updated = self.store.clone();
        updated.user_mut(name).append(date, entry);
        updated.save(&self.path)?;
        self.store = updated;
        Ok(())
    }

    pub fn log_exercise(&mut self, date: NaiveDate, form: &ExerciseForm) -> Result<ExerciseEntry> {
        self.ensure_user()?;
        let entry = form.validate(self.catalog)?;
        self.record_entry(date, LogEntry::Exercise(entry.clone()))?;
        Ok(entry)
    }

    pub fn log_movement(&mut self, date: NaiveDate, form: &MovementForm) -> Result<MovementEntry> {
        self.ensure_user()?;
        let entry = form.validate(self.catalog)?;
        self.record_entry(date, LogEntry::Movement(entry.clone()))?;
        Ok(entry)
    }

    pub fn log_meal(&mut self, date: NaiveDate, form: &MealForm) -> Result<MealEntry> {
        self.ensure_user()?;
        let entry = form.validate()?;
        self.record_entry(date, LogEntry::Meal(entry.clone()))?;
        Ok(entry)
    }

    /// Fill a meal form's numbers from a nutrition lookup of its name
    ///
    /// The form is left untouched when the lookup fails.
    pub fn autofill_meal(
        &self,
        lookup: &dyn NutritionLookup,
        form: &mut MealForm,
    ) -> Result<NutritionFacts> {
        let facts = lookup.lookup(&form.name)?;
        form.calories = facts.calories.to_string();
        form.protein = facts.protein_g.to_string();
        form.carbs = facts.carbs_g.to_string();
        Ok(facts)
    }

    /// Daily summary for the active user; `None` when nothing was logged
    pub fn summary(&self, date: NaiveDate) -> Result<Option<DailySummary>> {
        Ok(summarize(self.record()?, date))
    }

    /// Daily summary for a date typed as `YYYY-MM-DD`
    pub fn summary_for(&self, raw_date: &str) -> Result<Option<DailySummary>> {
        let date = parse_date(raw_date)?;
        self.summary(date)
    }

    /// Write the whole store back to its file
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.path)
    }

    fn ensure_user(&self) -> Result<()> {
        if self.user.is_none() {
            return Err(Error::NoActiveUser);
        }
        Ok(())
    }
}
