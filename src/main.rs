//! Student Dashboard server
//!
//! Serves the dashboard, search and insights pages plus their JSON view models.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use student_dashboard::classifier::StudentClassifier;
use student_dashboard::config::{Thresholds, DEFAULT_BIND, DEFAULT_PORT, DEFAULT_ROSTER_FILE};
use student_dashboard::data::save_flat_csv;
use student_dashboard::generate::{generate_roster, DEFAULT_GENERATED_STUDENTS};
use student_dashboard::roster::{FileRosterSource, HttpRosterSource, RosterSourceKind};
use student_dashboard::server::{start_server, AppState};
use student_dashboard::theme::{Preferences, Theme};

/// Student Dashboard - subject averages, at-risk students and insights
#[derive(Parser, Debug)]
#[command(name = "student_dashboard")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "DASHBOARD_BIND", default_value = DEFAULT_BIND)]
    bind: String,

    /// Port to listen on
    #[arg(short, long, env = "DASHBOARD_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Upstream roster endpoint (JSON array of students); takes precedence over --roster-file
    #[arg(long, env = "DASHBOARD_ROSTER_URL")]
    roster_url: Option<String>,

    /// Local roster file (.csv flat rows or .json)
    #[arg(long, env = "DASHBOARD_ROSTER_FILE", default_value = DEFAULT_ROSTER_FILE)]
    roster_file: PathBuf,

    /// Initial theme preference
    #[arg(long, value_enum, default_value_t = Theme::Light)]
    theme: Theme,

    /// Write a synthetic roster of N students to --roster-file and exit
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = DEFAULT_GENERATED_STUDENTS.to_string())]
    generate: Option<usize>,

    /// Seed for --generate; omit for a random roster
    #[arg(long, requires = "generate")]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    if let Some(count) = cli.generate {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let students = generate_roster(count, &mut rng).context("Failed to generate roster")?;
        save_flat_csv(&cli.roster_file, &students)
            .with_context(|| format!("Failed to write {}", cli.roster_file.display()))?;
        info!("Wrote {} students to {}", students.len(), cli.roster_file.display());
        return Ok(());
    }

    let source = match cli.roster_url {
        Some(url) => {
            let source = HttpRosterSource::new(url).context("Failed to build roster HTTP client")?;
            info!("Roster source: {}", source.url());
            RosterSourceKind::Http(source)
        }
        None => {
            if !cli.roster_file.exists() {
                warn!(
                    "Roster file {} does not exist; pages will show no students",
                    cli.roster_file.display()
                );
            }
            info!("Roster source: {}", cli.roster_file.display());
            RosterSourceKind::File(FileRosterSource::new(cli.roster_file))
        }
    };

    let thresholds = Thresholds::default();
    info!(
        "At-risk rule: {} or more subjects below GPA {}",
        thresholds.at_risk_min_subjects, thresholds.low_gpa
    );

    let state = AppState::new(source, StudentClassifier::new(thresholds), Preferences::with_theme(cli.theme));

    info!("Visit http://{}:{}/dashboard in your browser!", cli.bind, cli.port);

    start_server(state, &cli.bind, cli.port)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
