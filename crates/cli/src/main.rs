use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rx_codec::PrescriptionRecord;
use rx_core::constants::DEFAULT_PROFILE_DIR;
use rx_core::{
    page_config_from_env_value, render_page, CalendarDate, CoreConfig, DoctorProfile,
    FileProfileStore, ListingFilter, PatientForm, PrintLayout, ProfileStore, VisitStats,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rxpad")]
#[command(about = "Prescription pad: print layout, validation and doctor profiles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a stored prescription as a printed page
    Render {
        /// Prescription JSON (bare record or `{"data": ...}`)
        record: PathBuf,
        /// Username whose doctor profile heads the page
        #[arg(long)]
        user: Option<String>,
        /// Print the layout tree as JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
    /// Validate the patient fields of a new prescription
    Validate {
        /// Prescription date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        date: String,
        /// Patient name
        #[arg(long, default_value = "")]
        name: String,
        /// Patient age in years
        #[arg(long, default_value = "")]
        age: String,
        /// Patient gender
        #[arg(long, default_value = "M")]
        gender: String,
        /// Next visit date (YYYY-MM-DD, optional)
        #[arg(long, default_value = "")]
        next_visit: String,
    },
    /// Show or store a doctor profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// List prescriptions, optionally filtered
    List {
        /// Prescription list JSON
        records: PathBuf,
        /// Case-insensitive part of the patient name
        #[arg(long)]
        name: Option<String>,
        /// First visit date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last visit date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Visit statistics for the report screen
    Stats {
        /// Prescription list JSON
        records: PathBuf,
        /// Reference day (YYYY-MM-DD), defaults to the local date
        #[arg(long)]
        today: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the stored profile as YAML
    Show { username: String },
    /// Store a profile read from a YAML file
    Set { username: String, file: PathBuf },
}

/// Entry point for the `rxpad` command line tool.
///
/// # Environment Variables
/// - `RXPAD_PROFILE_DIR`: Directory of stored doctor profiles (default: "profiles")
/// - `RXPAD_PAGE_LINES`: Lines per page column (default: 48)
/// - `RUST_LOG`: Log filter; logs go to stderr
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rxpad=info".parse()?)
                .add_directive("rx_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = load_config()?;

    match cli.command {
        Commands::Render { record, user, json } => {
            let json_text = read(&record)?;
            let profile = match user {
                Some(username) => {
                    let profile = FileProfileStore::new(&cfg).get(&username)?;
                    match &profile {
                        None => tracing::warn!(username = %username, "no doctor profile stored"),
                        Some(p) if !p.is_complete() => {
                            tracing::warn!(username = %username, "doctor profile lacks name or degree")
                        }
                        Some(_) => {}
                    }
                    profile
                }
                None => None,
            };

            let layout = PrintLayout::from_response(&json_text, profile.as_ref(), cfg.page())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
            } else {
                print!("{}", render_page(&layout));
            }
        }
        Commands::Validate {
            date,
            name,
            age,
            gender,
            next_visit,
        } => {
            let form = PatientForm {
                prescription_date: date,
                patient_name: name,
                patient_age: age,
                patient_gender: gender,
                next_visit_date: next_visit,
            };
            match form.validate() {
                Ok(_) => println!("ok"),
                Err(errors) => {
                    for (field, message) in errors.iter() {
                        println!("{field}: {message}");
                    }
                    bail!("{} field(s) failed validation", errors.len());
                }
            }
        }
        Commands::Profile { action } => {
            let store = FileProfileStore::new(&cfg);
            match action {
                ProfileAction::Show { username } => match store.get(&username)? {
                    Some(profile) => print!("{}", profile.to_yaml()?),
                    None => println!("No profile stored for {username}."),
                },
                ProfileAction::Set { username, file } => {
                    let profile = DoctorProfile::from_yaml(&read(&file)?)?;
                    if !profile.is_complete() {
                        tracing::warn!(username = %username, "storing profile without name or degree");
                    }
                    store.put(&username, &profile)?;
                    println!("Stored profile for {username}.");
                }
            }
        }
        Commands::List {
            records,
            name,
            from,
            to,
        } => {
            let records = PrescriptionRecord::parse_list(&read(&records)?)?;
            let filter = ListingFilter {
                name_query: name.unwrap_or_default(),
                from: from.as_deref().map(parse_date).transpose()?,
                to: to.as_deref().map(parse_date).transpose()?,
            };

            let matching = filter.apply(&records);
            if matching.is_empty() {
                println!("No prescriptions found.");
            }
            for record in matching {
                let id = record
                    .prescription_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".into());
                println!("{id}\t{}\t{}", record.visit, record.name);
            }
        }
        Commands::Stats { records, today } => {
            let records = PrescriptionRecord::parse_list(&read(&records)?)?;
            let today = match today {
                Some(day) => parse_date(&day)?,
                None => CalendarDate::from_naive(chrono::Local::now().date_naive()),
            };

            let stats = VisitStats::compute(&records, today);
            println!("Total:      {} visits, {} patients", stats.total_visits, stats.total_patients);
            println!("Today:      {} visits, {} patients", stats.today_visits, stats.today_patients);
            println!("This month: {} visits, {} patients", stats.month_visits, stats.month_patients);
            println!(
                "Last month: {} visits, {} patients",
                stats.last_month_visits, stats.last_month_patients
            );
        }
    }

    Ok(())
}

fn load_config() -> anyhow::Result<CoreConfig> {
    let profile_dir =
        std::env::var("RXPAD_PROFILE_DIR").unwrap_or_else(|_| DEFAULT_PROFILE_DIR.into());
    let page = page_config_from_env_value(std::env::var("RXPAD_PAGE_LINES").ok())?;
    Ok(CoreConfig::new(PathBuf::from(profile_dir), page)?)
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn parse_date(input: &str) -> anyhow::Result<CalendarDate> {
    CalendarDate::parse(input).with_context(|| format!("invalid date: {input:?}"))
}
