//! Eventcalc - terminal editor for the event evaluation calculator workbook

mod config;
mod error;
mod logging;
#[cfg(feature = "tui")]
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use eventcalc_core::storage::{write_markdown, write_submission};
use eventcalc_core::{HeaderMode, ParamField, Session};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use config::Config;
use logging::LogTarget;

#[derive(Parser, Debug)]
#[command(name = "eventcalc", version, about = "Edit the input cells of the event calculator workbook")]
struct Cli {
    /// Workbook to open (.xlsx, .xlsm, .xlsb, .xls, .ods)
    file: Option<PathBuf>,

    /// Config file (default: <config dir>/eventcalc/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sheet holding the table
    #[arg(long, value_name = "NAME")]
    sheet: Option<String>,

    /// Display range in A1 notation, e.g. C27:O134
    #[arg(long, value_name = "A1:B2")]
    range: Option<String>,

    /// Take column names from the first row of the range
    #[arg(long)]
    header_row: bool,

    /// Input columns, comma separated
    #[arg(long, value_name = "COLUMNS", value_delimiter = ',')]
    editable: Option<Vec<String>>,

    /// Do not read the city list
    #[arg(long)]
    no_cities: bool,

    /// Do not read the venue type and format lists
    #[arg(long)]
    no_options: bool,

    /// City to select
    #[arg(long, value_name = "NAME")]
    city: Option<String>,

    /// Venue type, one of the listed venue types
    #[arg(long, value_name = "NAME")]
    venue: Option<String>,

    /// Scenario name
    #[arg(long, value_name = "NAME")]
    scenario: Option<String>,

    /// Event days
    #[arg(long, value_name = "N")]
    days: Option<String>,

    /// Placement period in days
    #[arg(long, value_name = "N")]
    period: Option<String>,

    /// Planned visitors
    #[arg(long, value_name = "N")]
    visitors: Option<String>,

    /// Print the table as markdown and exit
    #[arg(long, conflicts_with = "calc")]
    dump: bool,

    /// Print the captured scenario (parameters and inputs) and exit
    #[arg(long)]
    calc: bool,
}

impl Cli {
    fn interactive(&self) -> bool {
        !self.dump && !self.calc
    }

    /// CLI flags win over the config file.
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(file) = &self.file {
            config.source = file.clone();
        }
        if let Some(sheet) = &self.sheet {
            config.table.sheet = Some(sheet.clone());
        }
        if let Some(range) = &self.range {
            config.table.range = Some(config::parse_range("--range", range)?);
        }
        if self.header_row {
            config.table.headers = HeaderMode::FirstRow;
        }
        if let Some(editable) = &self.editable {
            config.table.editable = editable.iter().map(|c| c.trim().to_string()).collect();
        }
        if self.no_cities {
            config.cities = None;
        }
        if self.no_options {
            config.options = None;
        }
        Ok(())
    }

    fn apply_to_session(&self, session: &mut Session) -> Result<()> {
        if let Some(city) = &self.city {
            session.select_city(city)?;
        }
        if let Some(venue) = &self.venue {
            session.set_venue_type(venue)?;
        }
        if let Some(name) = &self.scenario {
            session.set_scenario_name(name);
        }
        let params = [
            (ParamField::EventDays, &self.days),
            (ParamField::PlacementDays, &self.period),
            (ParamField::PlannedVisitors, &self.visitors),
        ];
        for (field, value) in params {
            if let Some(value) = value {
                session.set_parameter(field, value)?;
            }
        }
        Ok(())
    }
}

fn run(cli: Cli) -> Result<()> {
    let target = if cli.interactive() {
        LogTarget::File
    } else {
        LogTarget::Stderr
    };
    if let Some(path) = logging::init(target) {
        log::debug!("logging to {}", path.display());
    }

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config)?;

    let loaded = config
        .load_workbook()
        .with_context(|| format!("Cannot load {}", config.source.display()))?;
    let mut session = Session::new(loaded.table, loaded.cities);
    session.set_options(loaded.options);
    cli.apply_to_session(&mut session)?;

    if cli.dump {
        let mut out = std::io::stdout().lock();
        write_markdown(&mut out, session.table())?;
        out.flush()?;
        return Ok(());
    }
    if cli.calc {
        let mut out = std::io::stdout().lock();
        write_submission(&mut out, &session.calculate())?;
        out.flush()?;
        return Ok(());
    }

    run_interactive(session, config)
}

#[cfg(feature = "tui")]
fn run_interactive(session: Session, config: Config) -> Result<()> {
    let mut app = tui::App::new(session, config);
    tui::run(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_interactive(_session: Session, _config: Config) -> Result<()> {
    anyhow::bail!("built without the terminal UI; use --dump or --calc")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
