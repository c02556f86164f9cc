use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use quarry_core::{Content, EMPTY_QUERY_MESSAGE, ExtractionConfig, ExtractionService, Format, Source};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod echo;

use echo::{
    format_size, print_banner, print_detail, print_error, print_info, print_step, print_success, print_timing,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Query HTML, XML and JSON documents and print the matches
#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(version)]
#[command(about = "Query HTML, XML and JSON documents", long_about = None)]
struct Args {
    /// URL to fetch, local file, or "-" for stdin
    #[arg(value_name = "INPUT", required_unless_present = "examples")]
    input: Option<String>,

    /// Query to run (e.g. "div.header", "//item[@id='1']", "name")
    #[arg(short, long, value_name = "QUERY", required_unless_present = "examples")]
    query: Option<String>,

    /// Document format (html, xml, json); inferred from the input when omitted
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<Format>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Characters of element text shown before truncating
    #[arg(long, default_value = "200", value_name = "NUM")]
    text_limit: usize,

    /// Print the matches as a JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Print query examples for the format and exit
    #[arg(long)]
    examples: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn describe_source(source: &Source) -> String {
    match source {
        Source::Url(url) => format!("Fetching from {}", url.bright_white().underline()),
        Source::File(path) => format!("Reading from file {}", path.display().bright_white()),
        Source::Stdin => "Reading from stdin".to_string(),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {

    let source = args.input.as_deref().map(Source::from_input);
    let format = args
        .format
        .or_else(|| source.as_ref().and_then(Source::infer_format))
        .unwrap_or(Format::Html);
    debug!(input = ?args.input, %format, "resolved document format");

    if args.examples {
        print!("{}", format.examples());
        return Ok(());
    }

    let source = source.context("An input is required")?;
    let query = args.query.unwrap_or_default();

    let mut builder = ExtractionConfig::builder().timeout(args.timeout).text_limit(args.text_limit);
    if let Some(user_agent) = args.user_agent {
        builder = builder.user_agent(user_agent);
    }
    let service = ExtractionService::with_config(builder.build());

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
        print_step(1, 3, &describe_source(&source));
    }

    let started = Instant::now();
    let content: Content = source
        .fetch(format, &service.config().fetch)
        .with_context(|| format!("Failed to load {}", source))?;

    if args.verbose {
        print_detail("Size", &format_size(content.len()));
        print_detail("Format", &format.to_string());
        print_timing("Fetch", started.elapsed());
        eprintln!();
        print_step(2, 3, &format!("Running query {}", query.bright_white()));
        print_detail("Hint", format.query_hint());
    }

    let started = Instant::now();
    let report = if args.json {
        let report = service
            .report(&content, format, &query)
            .with_context(|| format!("Failed to query {} document", format))?;
        match report {
            Some(report) => report.to_json()? + "\n",
            None => EMPTY_QUERY_MESSAGE.to_string(),
        }
    } else {
        service
            .run(&content, format, &query)
            .with_context(|| format!("Failed to query {} document", format))?
    };

    if args.verbose {
        print_timing("Query", started.elapsed());
        eprintln!();
        print_step(3, 3, "Writing output");
        eprintln!();
    }

    match args.output {
        Some(path) => {
            fs::write(&path, report).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", report);
        }
    }

    Ok(())
}
