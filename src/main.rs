use clap::{Parser, ValueEnum};
use gemq::{
    filter_diamonds, filter_settings, find_diamond_by_sku, find_setting_by_id, values, Dataset,
    DiamondFilterRequest, Record, SettingFilterRequest,
};
use serde::Serialize;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gemq", about = "Query a diamond and setting catalog by grade and range filters")]
struct Cli {
    #[arg(long, env = "GEMQ_DB", help = "Dataset file (JSON, or YAML by extension)")]
    db: Option<PathBuf>,

    #[arg(value_enum, help = "Collection to query")]
    collection: Collection,

    #[arg(help = "Filter request as a JSON object")]
    filter: Option<String>,

    #[arg(long, help = "Read the filter request from stdin")]
    stdin: bool,

    #[arg(long, help = "Look up a single record by sku or id")]
    id: Option<String>,

    #[arg(long, help = "List unique values for a property")]
    values: Option<String>,

    #[arg(long, help = "Show count for each value (use with --values)")]
    count: bool,

    #[arg(long, help = "Pretty-print JSON output")]
    pretty: bool,

    #[arg(long, env = "GEMQ_LOG", default_value = "warn", help = "Log filter directive")]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Collection {
    Diamonds,
    Settings,
}

/// What a mode prints to stdout and the status it exits with.
#[derive(Debug, PartialEq, Eq)]
struct Outcome {
    lines: Vec<String>,
    code: u8,
}

impl Outcome {
    fn new(lines: Vec<String>, code: u8) -> Self {
        Self { lines, code }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let Some(db_path) = cli.db.as_ref() else {
        eprintln!("Error: No dataset specified. Use --db or set GEMQ_DB");
        return ExitCode::from(2);
    };

    let dataset = match Dataset::load(db_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    let body = if cli.id.is_some() {
        String::new()
    } else {
        match read_body(&cli) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("Error: failed to read filter from stdin: {}", e);
                return ExitCode::from(2);
            }
        }
    };

    match run(&cli, &dataset, &body) {
        Ok(outcome) => {
            for line in outcome.lines {
                println!("{}", line);
            }
            ExitCode::from(outcome.code)
        }
        Err(e) => {
            eprintln!("Error: failed to serialize output: {}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_body(cli: &Cli) -> io::Result<String> {
    if cli.stdin {
        let mut body = String::new();
        io::stdin().lock().read_to_string(&mut body)?;
        return Ok(body);
    }
    Ok(cli.filter.clone().unwrap_or_default())
}

fn run(cli: &Cli, dataset: &Dataset, body: &str) -> serde_json::Result<Outcome> {
    if let Some(id) = &cli.id {
        return match cli.collection {
            Collection::Diamonds => {
                run_lookup_mode(find_diamond_by_sku(&dataset.diamonds, id), cli.pretty)
            }
            Collection::Settings => {
                run_lookup_mode(find_setting_by_id(&dataset.settings, id), cli.pretty)
            }
        };
    }

    match cli.collection {
        Collection::Diamonds => {
            let decoded = DiamondFilterRequest::from_json_str(body);
            let results = filter_diamonds(&dataset.diamonds, &decoded.request);
            run_results_mode(&results, cli)
        }
        Collection::Settings => {
            let decoded = SettingFilterRequest::from_json_str(body);
            let results = filter_settings(&dataset.settings, &decoded.request);
            run_results_mode(&results, cli)
        }
    }
}

fn run_results_mode<R: Record + Serialize>(
    results: &[&R],
    cli: &Cli,
) -> serde_json::Result<Outcome> {
    if let Some(property) = &cli.values {
        return Ok(run_values_mode(results, property, cli.count));
    }

    let json = render_json(&results, cli.pretty)?;
    let code = if results.is_empty() { 1 } else { 0 };
    Ok(Outcome::new(vec![json], code))
}

fn run_values_mode<R: Record>(results: &[&R], property: &str, show_count: bool) -> Outcome {
    let counts = values::collect_values(results, property);

    if counts.is_empty() {
        return Outcome::new(Vec::new(), 1);
    }

    Outcome::new(values::format_values(counts, property, show_count), 0)
}

fn run_lookup_mode<R: Serialize>(found: Option<&R>, pretty: bool) -> serde_json::Result<Outcome> {
    match found {
        Some(record) => Ok(Outcome::new(vec![render_json(record, pretty)?], 0)),
        None => Ok(Outcome::new(vec!["{}".to_string()], 1)),
    }
}

fn render_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
