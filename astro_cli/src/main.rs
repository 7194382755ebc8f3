use astro_core::session::today;
use astro_core::*;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

mod interactive;

#[derive(Parser)]
#[command(name = "astrofit")]
#[command(about = "Astronaut fitness tracker: log exercise, meals and movement", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the data file location
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Astronaut name to log for
    #[arg(long, short, global = true)]
    user: Option<String>,

    /// Show more log output on stderr (-v info, -vv debug)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Log an exercise for today
    Exercise {
        /// Catalog exercise name (see `catalog`)
        #[arg(long, required_unless_present = "other")]
        name: Option<String>,

        /// Name of an exercise that is not in the catalog
        #[arg(long, conflicts_with = "name", requires = "rate")]
        other: Option<String>,

        /// Calories per minute for an `--other` exercise
        #[arg(long, requires = "other", allow_hyphen_values = true)]
        rate: Option<String>,

        /// Duration in minutes
        #[arg(long, allow_hyphen_values = true)]
        duration: String,
    },

    /// Log a walk or jog for today
    Movement {
        #[arg(long, value_enum, default_value_t = ActivityArg::Walking)]
        activity: ActivityArg,

        /// Speed tier, e.g. "Moderate" or "Moderate (3 km/h)"; slowest if omitted
        #[arg(long)]
        speed: Option<String>,

        /// Total duration in minutes
        #[arg(long, allow_hyphen_values = true)]
        duration: String,

        /// Minutes of the total spent in microgravity
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        microgravity: String,
    },

    /// Log a meal for today
    Meal {
        /// Meal description; may include quantities like "2 eggs"
        #[arg(long)]
        name: String,

        #[arg(long, allow_hyphen_values = true)]
        calories: Option<String>,

        /// Protein in grams
        #[arg(long, allow_hyphen_values = true)]
        protein: Option<String>,

        /// Carbohydrates in grams
        #[arg(long, allow_hyphen_values = true)]
        carbs: Option<String>,

        /// Fill missing numbers from the nutrition service
        #[arg(long)]
        lookup: bool,
    },

    /// Show the daily summary
    Summary {
        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Look up nutrition facts without logging anything
    Lookup {
        /// Food description, e.g. "1 cup rice"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// List the built-in exercises and speed tiers
    Catalog,

    /// Export every logged entry of a user to CSV
    Export {
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ActivityArg {
    Walking,
    Jogging,
}

impl From<ActivityArg> for Activity {
    fn from(arg: ActivityArg) -> Self {
        match arg {
            ActivityArg::Walking => Activity::Walking,
            ActivityArg::Jogging => Activity::Jogging,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    astro_core::logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let store_path = cli
        .data_file
        .clone()
        .unwrap_or_else(|| config.data.store_path());

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Config("Invalid rate catalog".into()));
    }

    let user = cli.user.as_deref();
    let open = |user: Option<&str>| open_session(&store_path, catalog, user);

    match cli.command {
        Some(Commands::Catalog) => {
            cmd_catalog(catalog);
            Ok(())
        }
        Some(Commands::Lookup { query }) => {
            let client = NutritionixClient::new(&config.nutrition)?;
            cmd_lookup(&client, &query.join(" "))
        }
        Some(Commands::Exercise {
            name,
            other,
            rate,
            duration,
        }) => cmd_exercise(&mut open(user)?, name, other, rate, duration),
        Some(Commands::Movement {
            activity,
            speed,
            duration,
            microgravity,
        }) => cmd_movement(
            &mut open(user)?,
            activity.into(),
            speed,
            duration,
            microgravity,
        ),
        Some(Commands::Meal {
            name,
            calories,
            protein,
            carbs,
            lookup,
        }) => {
            let form = MealForm {
                name,
                calories: calories.unwrap_or_default(),
                protein: protein.unwrap_or_default(),
                carbs: carbs.unwrap_or_default(),
            };
            let client = if lookup {
                Some(NutritionixClient::new(&config.nutrition)?)
            } else {
                None
            };
            cmd_meal(&mut open(user)?, form, client.as_ref())
        }
        Some(Commands::Summary { date }) => cmd_summary(&open(user)?, date),
        Some(Commands::Export { output }) => cmd_export(&open(user)?, &output),
        None => {
            let mut session = open(None)?;
            if !config.nutrition.has_credentials() {
                tracing::warn!("Nutrition API keys are not set; meal auto-fill will not work");
            }
            let client = NutritionixClient::new(&config.nutrition)?;
            let stdin = std::io::stdin();
            let mut console = interactive::Console::new(stdin.lock(), std::io::stdout());
            console.run(&mut session, &client, user)
        }
    }
}

/// Load the store, report a quarantined data file, and select the user if given
fn open_session<'c>(
    store_path: &std::path::Path,
    catalog: &'c RateCatalog,
    user: Option<&str>,
) -> Result<Session<'c>> {
    let mut session = Session::open(store_path, catalog)?;
    tracing::debug!("Using data file {:?}", session.path());
    if let Some(notice) = session.take_corruption_notice() {
        eprintln!("Warning: {}", notice);
    }
    if let Some(name) = user {
        session.select_user(name)?;
    }
    Ok(session)
}

fn cmd_exercise(
    session: &mut Session,
    name: Option<String>,
    other: Option<String>,
    rate: Option<String>,
    duration: String,
) -> Result<()> {
    let selection = match other {
        Some(other) => ExerciseSelection::Other {
            name: other,
            calories_per_minute: rate.unwrap_or_default(),
        },
        None => ExerciseSelection::Named(name.unwrap_or_default()),
    };
    let form = ExerciseForm {
        selection,
        duration,
    };

    let entry = session.log_exercise(today(), &form)?;
    println!(
        "✓ {} logged! {} calories burned.",
        entry.name,
        summary::format_amount(entry.calories)
    );
    Ok(())
}

fn cmd_movement(
    session: &mut Session,
    activity: Activity,
    speed: Option<String>,
    duration: String,
    microgravity: String,
) -> Result<()> {
    let form = MovementForm {
        activity: activity.to_string(),
        speed,
        duration,
        microgravity,
    };

    let entry = session.log_movement(today(), &form)?;
    println!(
        "✓ {} at {} logged! Calories burned: {}",
        entry.activity,
        entry.speed_label,
        summary::format_amount(entry.calories)
    );
    Ok(())
}

fn cmd_meal(
    session: &mut Session,
    mut form: MealForm,
    lookup: Option<&NutritionixClient>,
) -> Result<()> {
    if let Some(client) = lookup {
        // Explicit values win over looked-up ones
        let manual = form.clone();
        let facts = session.autofill_meal(client, &mut form)?;
        for (field, value) in [
            (&mut form.calories, manual.calories),
            (&mut form.protein, manual.protein),
            (&mut form.carbs, manual.carbs),
        ] {
            if !value.trim().is_empty() {
                *field = value;
            }
        }
        println!(
            "Nutrition info auto-filled{}.",
            facts
                .food_name
                .map(|name| format!(" from \"{}\"", name))
                .unwrap_or_default()
        );
    }

    let entry = session.log_meal(today(), &form)?;
    println!(
        "✓ Meal logged! {}: {} cal, {}g protein, {}g carbs",
        entry.name,
        summary::format_amount(entry.calories),
        summary::format_amount(entry.protein_g),
        summary::format_amount(entry.carbs_g)
    );
    Ok(())
}

fn cmd_summary(session: &Session, date: Option<String>) -> Result<()> {
    let date: NaiveDate = match date {
        Some(raw) => validate::parse_date(&raw)?,
        None => today(),
    };

    match session.summary(date)? {
        Some(summary) => {
            let name = session.display_name().unwrap_or_default();
            print!("{}", summary.render(&name));
        }
        None => println!("No data found for {}.", date),
    }
    Ok(())
}

fn cmd_lookup(lookup: &dyn NutritionLookup, query: &str) -> Result<()> {
    let facts = lookup.lookup(query)?;
    if let Some(name) = &facts.food_name {
        println!("{}", name);
    }
    println!("  Calories: {}", summary::format_amount(facts.calories));
    println!("  Protein:  {} g", summary::format_amount(facts.protein_g));
    println!("  Carbs:    {} g", summary::format_amount(facts.carbs_g));
    Ok(())
}

fn cmd_catalog(catalog: &RateCatalog) {
    println!("Exercises (calories per minute):");
    for exercise in &catalog.exercises {
        println!("  {:<20} {}", exercise.name, exercise.calories_per_minute);
    }

    for activity in Activity::ALL {
        println!();
        println!("{} speeds (calories per minute):", activity);
        for tier in catalog.speed_tiers(activity) {
            println!("  {:<20} {}", tier.label, tier.calories_per_minute);
        }
    }
}

fn cmd_export(session: &Session, output: &std::path::Path) -> Result<()> {
    let record = session.record()?;
    let count = export::export_user_csv(record, output)?;
    println!("✓ Exported {} entries to {}", count, output.display());
    Ok(())
}
