//! Interactive menu session.
//!
//! Reads one answer per line. Errors from logging or lookups are shown and
//! the menu comes back; only console I/O failures end the session early.
//! End of input at the menu saves and exits.

use astro_core::session::{display_name, today};
use astro_core::summary::format_amount;
use astro_core::*;
use std::io::{BufRead, Write};

const MENU: [&str; 6] = [
    "Log Exercise",
    "Log Meal",
    "Log Movement",
    "View Daily Summary",
    "Switch User",
    "Save & Exit",
];

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn run(
        &mut self,
        session: &mut Session,
        lookup: &dyn NutritionLookup,
        user: Option<&str>,
    ) -> Result<()> {
        if let Some(name) = user {
            if let Err(e) = session.select_user(name) {
                self.report(&e)?;
            }
        }
        if session.active_user().is_none() && !self.login(session)? {
            return self.finish(session);
        }

        loop {
            let name = session.display_name().unwrap_or_default();
            writeln!(self.output)?;
            writeln!(self.output, "Welcome, {}", name)?;
            for (i, item) in MENU.iter().enumerate() {
                writeln!(self.output, "  {}. {}", i + 1, item)?;
            }

            let Some(choice) = self.prompt(">")? else {
                return self.finish(session);
            };

            match choice.trim() {
                "1" => self.log_exercise(session)?,
                "2" => self.log_meal(session, lookup)?,
                "3" => self.log_movement(session)?,
                "4" => self.view_summary(session)?,
                "5" => {
                    if !self.login(session)? {
                        return self.finish(session);
                    }
                }
                "6" => {
                    if self.confirm("Do you want to save and exit? [y/N]")? {
                        return self.finish(session);
                    }
                }
                other => writeln!(self.output, "Invalid choice: {:?}", other)?,
            }
        }
    }

    /// Ask for a user name until a valid one is given; false at end of input
    fn login(&mut self, session: &mut Session) -> Result<bool> {
        let known: Vec<String> = session.store().user_names().map(display_name).collect();
        if !known.is_empty() {
            writeln!(self.output, "Known astronauts: {}", known.join(", "))?;
        }
        loop {
            let Some(name) = self.prompt("Enter Astronaut Name:")? else {
                return Ok(false);
            };
            match session.select_user(&name) {
                Ok(_) => return Ok(true),
                Err(e) => self.report(&e)?,
            }
        }
    }

    fn log_exercise(&mut self, session: &mut Session) -> Result<()> {
        let names: Vec<String> = session
            .catalog()
            .exercises
            .iter()
            .map(|e| e.name.clone())
            .collect();

        writeln!(self.output, "Select Exercise:")?;
        for (i, name) in names.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, name)?;
        }
        let others = names.len() + 1;
        writeln!(self.output, "  {}. Others", others)?;

        let Some(choice) = self.prompt_with_default("Exercise number", "1")? else {
            return Ok(());
        };
        let Some(index) = parse_choice(&choice, others) else {
            writeln!(self.output, "Invalid choice: {:?}", choice.trim())?;
            return Ok(());
        };

        let Some(duration) = self.prompt("Duration (minutes):")? else {
            return Ok(());
        };

        let selection = if index == others {
            let Some(name) = self.prompt("Exercise Name (Other):")? else {
                return Ok(());
            };
            let Some(rate) = self.prompt("Calories per Minute:")? else {
                return Ok(());
            };
            ExerciseSelection::Other {
                name,
                calories_per_minute: rate,
            }
        } else {
            ExerciseSelection::Named(names[index - 1].clone())
        };

        let form = ExerciseForm {
            selection,
            duration,
        };
        match session.log_exercise(today(), &form) {
            Ok(entry) => writeln!(
                self.output,
                "{} logged! {} calories burned!",
                entry.name,
                format_amount(entry.calories)
            )?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn log_meal(&mut self, session: &mut Session, lookup: &dyn NutritionLookup) -> Result<()> {
        let Some(name) = self.prompt("Meal Name (you can include quantities, e.g. '2 eggs'):")?
        else {
            return Ok(());
        };

        let mut form = MealForm {
            name,
            ..MealForm::default()
        };

        if self.confirm("Fetch nutrition info? [y/N]")? {
            match session.autofill_meal(lookup, &mut form) {
                Ok(_) => writeln!(self.output, "Nutrition info auto-filled!")?,
                Err(e) => {
                    self.report(&e)?;
                    // The rate-limit message already says this
                    if !matches!(e, Error::LookupUnavailable(LookupFailure::RateLimited)) {
                        writeln!(self.output, "Please enter nutrition info manually.")?;
                    }
                }
            }
        }

        let Some(calories) = self.prompt_with_default("Calories", &form.calories)? else {
            return Ok(());
        };
        let Some(protein) = self.prompt_with_default("Protein (g)", &form.protein)? else {
            return Ok(());
        };
        let Some(carbs) = self.prompt_with_default("Carbs (g)", &form.carbs)? else {
            return Ok(());
        };
        form.calories = calories;
        form.protein = protein;
        form.carbs = carbs;

        match session.log_meal(today(), &form) {
            Ok(_) => writeln!(self.output, "Meal logged!")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn log_movement(&mut self, session: &mut Session) -> Result<()> {
        writeln!(self.output, "Select Activity Type:")?;
        for (i, activity) in Activity::ALL.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, activity)?;
        }
        let Some(choice) = self.prompt_with_default("Activity number", "1")? else {
            return Ok(());
        };
        let Some(index) = parse_choice(&choice, Activity::ALL.len()) else {
            writeln!(self.output, "Invalid choice: {:?}", choice.trim())?;
            return Ok(());
        };
        let activity = Activity::ALL[index - 1];

        let tiers: Vec<String> = session
            .catalog()
            .speed_tiers(activity)
            .iter()
            .map(|t| t.label.clone())
            .collect();
        writeln!(self.output, "Select Speed:")?;
        for (i, label) in tiers.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, label)?;
        }
        let Some(choice) = self.prompt_with_default("Speed number", "1")? else {
            return Ok(());
        };
        let Some(speed) = parse_choice(&choice, tiers.len()) else {
            writeln!(self.output, "Invalid choice: {:?}", choice.trim())?;
            return Ok(());
        };

        let Some(duration) = self.prompt("Duration (minutes):")? else {
            return Ok(());
        };
        let Some(microgravity) =
            self.prompt_with_default("Microgravity Duration (minutes, part of the total)", "0")?
        else {
            return Ok(());
        };

        let form = MovementForm {
            activity: activity.to_string(),
            speed: Some(tiers[speed - 1].clone()),
            duration,
            microgravity,
        };
        match session.log_movement(today(), &form) {
            Ok(entry) => writeln!(
                self.output,
                "{} logged! Calories burned: {}",
                entry.activity,
                format_amount(entry.calories)
            )?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn view_summary(&mut self, session: &Session) -> Result<()> {
        let Some(raw) = self.prompt("Enter date (YYYY-MM-DD), blank for today:")? else {
            return Ok(());
        };

        let result = if raw.trim().is_empty() {
            session.summary(today()).map(|s| (today().to_string(), s))
        } else {
            session.summary_for(&raw).map(|s| (raw.trim().to_string(), s))
        };

        match result {
            Ok((_, Some(summary))) => {
                let name = session.display_name().unwrap_or_default();
                writeln!(self.output)?;
                write!(self.output, "{}", summary.render(&name))?;
            }
            Ok((date, None)) => writeln!(self.output, "No data found for {}.", date)?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn finish(&mut self, session: &Session) -> Result<()> {
        match session.save() {
            Ok(()) => writeln!(self.output, "Data saved. Goodbye!")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn report(&mut self, error: &Error) -> Result<()> {
        match error {
            Error::InputValidation(e) => writeln!(self.output, "Input Error: {}", e)?,
            Error::LookupUnavailable(LookupFailure::RateLimited) => {
                writeln!(self.output, "API Limit Reached: {}", LookupFailure::RateLimited)?
            }
            other => writeln!(self.output, "Error: {}", other)?,
        }
        Ok(())
    }

    /// Print a prompt and read one line; `None` at end of input
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{} ", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt_with_default(&mut self, label: &str, default: &str) -> Result<Option<String>> {
        let text = if default.is_empty() {
            format!("{}:", label)
        } else {
            format!("{} [{}]:", label, default)
        };
        Ok(self.prompt(&text)?.map(|answer| {
            if answer.trim().is_empty() {
                default.to_string()
            } else {
                answer
            }
        }))
    }

    /// Yes/no question defaulting to no; end of input counts as yes
    fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(match self.prompt(question)? {
            Some(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            None => true,
        })
    }
}

/// Parse a 1-based menu choice in `1..=max`
fn parse_choice(raw: &str, max: usize) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| (1..=max).contains(n))
}
