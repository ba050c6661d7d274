//! ED Explorer CLI
//!
//! Command-line interface for the encounter API:
//! - List and filter encounters
//! - Show one encounter with its vitals timeline
//! - Print the filter vocabularies
//! - Browse interactively
//! - Generate a config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ed_explorer::chart::{SeriesVisibility, VitalSeries};
use ed_explorer::client::{open_detail, refresh_list, ClientConfig, EncounterClient, EncounterSource};
use ed_explorer::config::{generate_default_config, Config, LoggingConfig, RejectedConfig};
use ed_explorer::query::{
    parse_date, FilterChange, Gender, QueryDescriptor, QueryError, SortColumn, SortOrder,
    MAX_PER_PAGE,
};
use ed_explorer::state::{DetailSession, ListSession, ViewState};
use ed_explorer::terminal;

#[derive(Parser)]
#[command(name = "ed-explorer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse emergency department encounters")]
#[command(long_about = "ED Explorer lists, filters and inspects emergency department visits.\nVital signs are shown as a timeline with gaps where nothing was measured.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Encounter API base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(clap::Args, Default)]
pub struct FilterArgs {
    /// Gender (M or F)
    #[arg(long)]
    gender: Option<String>,
    /// Race; repeat for several
    #[arg(long)]
    race: Vec<String>,
    /// Disposition; repeat for several
    #[arg(long)]
    disposition: Vec<String>,
    /// Arrivals on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,
    /// Arrivals on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,
    /// Chief complaint search text
    #[arg(long)]
    complaint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List encounters
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Rows per page (1-100)
        #[arg(long)]
        per_page: Option<u32>,
        /// Sort column (stay_id, intime, outtime, disposition)
        #[arg(short, long)]
        sort: Option<String>,
        /// Sort direction (asc, desc)
        #[arg(short, long)]
        order: Option<String>,
    },

    /// Show one encounter
    Show {
        /// Stay ID
        stay_id: i64,
        /// Vital series to chart (comma-separated; default: heartrate,sbp,dbp,o2sat)
        #[arg(long, value_delimiter = ',')]
        series: Vec<String>,
    },

    /// Print available filter values
    Options,

    /// Interactive session (type `help` once started)
    Browse,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write config to {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let (mut config, rejected) = match &cli.config {
        Some(path) => (
            Config::load_with_env(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            Vec::new(),
        ),
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_tracing(&config.logging)?;
    report_rejected(&rejected);
    tracing::debug!(api = %config.api.base_url, "ED Explorer v{}", env!("CARGO_PKG_VERSION"));

    let client = EncounterClient::new(ClientConfig::from(&config.api))?;
    let initial = config.list.initial_descriptor()?;

    match cli.command {
        Commands::List {
            filters,
            page,
            per_page,
            sort,
            order,
        } => {
            let descriptor =
                build_descriptor(initial, &filters, page, per_page, sort.as_deref(), order.as_deref())?;
            run_list(&client, descriptor, cli.format).await?;
        }

        Commands::Show { stay_id, series } => {
            let visibility = parse_series(&series)?;
            run_show(&client, stay_id, visibility, cli.format).await?;
        }

        Commands::Options => {
            let options = match client.filter_options().await {
                Ok(options) => options,
                Err(e) => fail(&e),
            };
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
                OutputFormat::Table => print!("{}", terminal::render_options(&options)),
                OutputFormat::Csv => bail!("csv output is only available for `list`"),
            }
        }

        Commands::Browse => browse(&client, initial).await?,

        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Install the tracing subscriber; logs go to stderr unless a file is configured
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("ed_explorer={}", logging.level)));

    let writer = match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .try_init()?;
    }
    Ok(())
}

/// Skipped config files go to stderr as well as the log, which may be a file
fn report_rejected(rejected: &[RejectedConfig]) {
    for skipped in rejected {
        tracing::warn!(path = ?skipped.path, error = %skipped.error, "Ignoring config file");
        eprintln!(
            "Warning: ignoring config file {}: {}",
            skipped.path.display(),
            skipped.error
        );
    }
}

fn build_descriptor(
    initial: QueryDescriptor,
    filters: &FilterArgs,
    page: u32,
    per_page: Option<u32>,
    sort: Option<&str>,
    order: Option<&str>,
) -> anyhow::Result<QueryDescriptor> {
    let mut descriptor = initial;

    if let Some(n) = per_page {
        if n == 0 || n > MAX_PER_PAGE {
            return Err(QueryError::InvalidPageSize(n).into());
        }
        descriptor = QueryDescriptor::new(n).sorted(descriptor.sort_by(), descriptor.sort_order());
    }

    let column = match sort {
        Some(s) => s.parse::<SortColumn>()?,
        None => descriptor.sort_by(),
    };
    let direction = match order {
        Some(o) => o.parse::<SortOrder>()?,
        None => descriptor.sort_order(),
    };
    descriptor = descriptor.sorted(column, direction);

    let change = filter_change(filters)?;
    Ok(descriptor.with_filter(change).starting_at(page))
}

fn filter_change(filters: &FilterArgs) -> anyhow::Result<FilterChange> {
    let mut change = FilterChange::new();

    if let Some(g) = &filters.gender {
        change = change.gender(Some(g.parse::<Gender>()?));
    }
    if !filters.race.is_empty() {
        change = change.races(filters.race.iter().cloned());
    }
    if !filters.disposition.is_empty() {
        change = change.dispositions(filters.disposition.iter().cloned());
    }
    if let Some(d) = &filters.from {
        change = change.date_from(Some(parse_date(d)?));
    }
    if let Some(d) = &filters.to {
        change = change.date_to(Some(parse_date(d)?));
    }
    if let Some(text) = &filters.complaint {
        change = change.chief_complaint(Some(text.clone()));
    }

    Ok(change)
}

fn parse_series(keys: &[String]) -> anyhow::Result<SeriesVisibility> {
    if keys.is_empty() {
        return Ok(SeriesVisibility::default());
    }
    let series = keys
        .iter()
        .map(|k| k.parse::<VitalSeries>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SeriesVisibility::only(series))
}

/// Print the failure panel and exit
fn fail(err: &ed_explorer::FetchError) -> ! {
    eprint!("{}", terminal::render_failure(err));
    std::process::exit(1);
}

async fn run_list<S: EncounterSource>(
    source: &S,
    descriptor: QueryDescriptor,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut session = ListSession::new(descriptor);
    refresh_list(source, &mut session).await;

    match (session.view(), format) {
        (ViewState::Ready(page), OutputFormat::Table) => {
            print!("{}", terminal::render_page(page, session.descriptor()))
        }
        (ViewState::Ready(page), OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(page)?)
        }
        (ViewState::Ready(page), OutputFormat::Csv) => {
            terminal::write_page_csv(page, std::io::stdout().lock())?
        }
        (ViewState::Empty, OutputFormat::Json) => {
            println!("{}", serde_json::json!({ "items": [], "total": 0 }))
        }
        (ViewState::Empty, OutputFormat::Csv) => {}
        (ViewState::Empty, OutputFormat::Table) => {
            print!("{}", terminal::render_empty_list(session.descriptor()))
        }
        (ViewState::Failed(e), _) => fail(e),
        (ViewState::Loading, _) => bail!("List request did not complete"),
    }
    Ok(())
}

async fn run_show<S: EncounterSource>(
    source: &S,
    stay_id: i64,
    visibility: SeriesVisibility,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut session = DetailSession::new();
    open_detail(source, &mut session, stay_id).await;
    session.set_visibility(visibility);

    let detail = match session.view() {
        ViewState::Ready(detail) => detail,
        ViewState::Failed(e) => fail(e),
        ViewState::Empty | ViewState::Loading => bail!("Encounter {} did not load", stay_id),
    };
    let Some(chart) = session.chart() else {
        bail!("Encounter {} has no chart state", stay_id);
    };

    match format {
        OutputFormat::Table => print!(
            "{}",
            terminal::render_detail(detail, chart, session.visibility())
        ),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "encounter": detail,
                "chart": session.frame(),
                "empty_message": chart.empty_message(),
            }))?
        ),
        OutputFormat::Csv => bail!("csv output is only available for `list`"),
    }
    Ok(())
}

const BROWSE_HELP: &str = "\
Commands:
  next | prev | page N          move between pages
  sort COLUMN                   stay_id, intime, outtime, disposition (again to flip)
  gender M|F|any                set or clear the gender filter
  race NAME | disposition NAME  toggle a multi-select value
  from DATE|any | to DATE|any   arrival date bounds (YYYY-MM-DD)
  complaint [TEXT]              chief-complaint search (empty clears)
  clear                         remove all filters
  open STAY_ID                  show one encounter
  toggle SERIES                 show/hide a vital series in the open encounter
  back                          return to the list
  help | quit";

#[derive(Debug, PartialEq)]
enum BrowseCommand {
    Next,
    Previous,
    Page(u32),
    Sort(SortColumn),
    Filter(FilterChange),
    ToggleRace(String),
    ToggleDisposition(String),
    Clear,
    Open(i64),
    Toggle(VitalSeries),
    Back,
    Help,
    Quit,
}

fn parse_browse_command(line: &str) -> anyhow::Result<BrowseCommand> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let optional = |value: &str| (!value.is_empty() && value != "any").then(|| value.to_string());

    let command = match word.to_lowercase().as_str() {
        "next" | "n" => BrowseCommand::Next,
        "prev" | "p" => BrowseCommand::Previous,
        "page" => BrowseCommand::Page(rest.parse().context("page needs a number")?),
        "sort" => BrowseCommand::Sort(rest.parse()?),
        "gender" => BrowseCommand::Filter(
            FilterChange::new().gender(optional(rest).map(|g| g.parse::<Gender>()).transpose()?),
        ),
        "race" if !rest.is_empty() => BrowseCommand::ToggleRace(rest.to_string()),
        "disposition" if !rest.is_empty() => BrowseCommand::ToggleDisposition(rest.to_uppercase()),
        "from" => BrowseCommand::Filter(
            FilterChange::new().date_from(optional(rest).map(|d| parse_date(&d)).transpose()?),
        ),
        "to" => BrowseCommand::Filter(
            FilterChange::new().date_to(optional(rest).map(|d| parse_date(&d)).transpose()?),
        ),
        "complaint" => BrowseCommand::Filter(FilterChange::new().chief_complaint(Some(rest))),
        "clear" => BrowseCommand::Clear,
        "open" => BrowseCommand::Open(rest.parse().context("open needs a stay id")?),
        "toggle" => BrowseCommand::Toggle(rest.parse()?),
        "back" | "b" => BrowseCommand::Back,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "q" | "exit" => BrowseCommand::Quit,
        _ => bail!("Unknown command: {} (type `help`)", line),
    };
    Ok(command)
}

async fn browse<S: EncounterSource>(source: &S, initial: QueryDescriptor) -> anyhow::Result<()> {
    let mut list = ListSession::new(initial);
    let mut detail = DetailSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", BROWSE_HELP);
    refresh_list(source, &mut list).await;
    print_list(&list);

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_browse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => println!("{}", BROWSE_HELP),
            BrowseCommand::Open(stay_id) => {
                open_detail(source, &mut detail, stay_id).await;
                print_detail(&detail);
            }
            BrowseCommand::Toggle(series) => {
                if detail.stay_id().is_none() {
                    eprintln!("Open an encounter first");
                    continue;
                }
                detail.toggle_series(series);
                print_detail(&detail);
            }
            BrowseCommand::Back => {
                detail.close();
                print_list(&list);
            }
            BrowseCommand::Next if !list.controller().has_next_page() => {
                eprintln!("Already on the last page");
            }
            BrowseCommand::Previous if !list.controller().has_previous_page() => {
                eprintln!("Already on the first page");
            }
            list_command => {
                let changed = match list_command {
                    BrowseCommand::Next => list.next_page(),
                    BrowseCommand::Previous => list.previous_page(),
                    BrowseCommand::Page(n) => list.set_page(n),
                    BrowseCommand::Sort(column) => list.set_sort(column),
                    BrowseCommand::Filter(change) => list.set_filter(change),
                    BrowseCommand::ToggleRace(race) => list.toggle_race(&race),
                    BrowseCommand::ToggleDisposition(d) => list.toggle_disposition(&d),
                    BrowseCommand::Clear => list.clear_filters(),
                    _ => false,
                };
                detail.close();
                if changed && list.needs_fetch() {
                    refresh_list(source, &mut list).await;
                }
                print_list(&list);
            }
        }
    }

    Ok(())
}

fn print_list(list: &ListSession) {
    match list.view() {
        ViewState::Loading => println!("Loading..."),
        ViewState::Empty => print!("{}", terminal::render_empty_list(list.descriptor())),
        ViewState::Ready(page) => print!("{}", terminal::render_page(page, list.descriptor())),
        ViewState::Failed(e) => print!("{}", terminal::render_failure(e)),
    }
}

fn print_detail(detail: &DetailSession) {
    match (detail.view(), detail.chart()) {
        (ViewState::Ready(encounter), Some(chart)) => print!(
            "{}",
            terminal::render_detail(encounter, chart, detail.visibility())
        ),
        (ViewState::Failed(e), _) => print!("{}", terminal::render_failure(e).replace(
            "run `ed-explorer list`",
            "type `back`"
        )),
        _ => println!("Loading..."),
    }
}
