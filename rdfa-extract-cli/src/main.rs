use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use rdfa_extract::{
    Collector, DictionaryCollector, GraphCollector, ParseOptions, ScreenCollector,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Format {
    /// One line per event, with warnings as comments
    #[default]
    Screen,
    /// Triples grouped by subject and predicate
    Dictionary,
    /// Turtle, with warnings on stderr
    Turtle,
}

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// An http(s) URL or a file path
    #[arg(value_name = "SOURCE")]
    source: String,

    /// Base URI for relative references; defaults to the URL when fetching
    #[arg(long)]
    base: Option<String>,

    /// Parse as HTML5 instead of well-formed XHTML
    #[arg(long)]
    html: bool,

    #[arg(long, value_enum, default_value_t)]
    format: Format,

    #[arg(long)]
    bnode_namespace: Option<String>,

    #[arg(long)]
    bnode_prefix: Option<String>,

    /// Print the offending markup after each warning (screen format)
    #[arg(long)]
    debug: bool,

    /// More logging on stderr; repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let Some((content, fetched_from)) = load(&args.source)? else {
        return Ok(ExitCode::FAILURE);
    };

    let mut options = ParseOptions::default();
    options.base_uri = args.base.clone().or(fetched_from);
    options.blank_node_namespace = args.bnode_namespace.clone();
    options.blank_node_prefix = args.bnode_prefix.clone();
    debug!("parse options: {options:?}");

    match args.format {
        Format::Screen => {
            let stdout = io::stdout().lock();
            let mut collector = ScreenCollector::new(stdout).with_debug(args.debug);
            extract(&args, &content, &options, &mut collector)?;
            collector.finish()?.flush()?;
        }
        Format::Dictionary => {
            let mut collector = DictionaryCollector::new();
            extract(&args, &content, &options, &mut collector)?;
            print!("{collector}");
            for warning in collector.warnings() {
                eprintln!("Warning: {warning}");
            }
        }
        Format::Turtle => {
            let mut output_graph = oxrdf::Graph::new();
            let mut processor_graph = oxrdf::Graph::new();
            let mut collector = GraphCollector::new(&mut output_graph, &mut processor_graph);
            extract(&args, &content, &options, &mut collector)?;

            {
                // output any warnings
                let serializer = oxttl::TurtleSerializer::new();
                let mut locked_err = io::stderr().lock();
                let mut writer = serializer.for_writer(&mut locked_err);
                for triple in processor_graph.iter() {
                    writer.serialize_triple(triple)?;
                }

                writer.finish()?;
            }

            let serializer = oxttl::TurtleSerializer::new();
            let mut locked_out = io::stdout().lock();
            let mut writer = serializer.for_writer(&mut locked_out);
            for triple in output_graph.iter() {
                writer.serialize_triple(triple)?;
            }

            writer.finish()?.flush()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn extract<C: Collector>(
    args: &Args,
    content: &str,
    options: &ParseOptions,
    collector: &mut C,
) -> Result<(), rdfa_extract::Error> {
    if args.html {
        rdfa_extract::parse_html(content, options, collector)
    } else {
        rdfa_extract::parse(content, options, collector)
    }
}

/// Reads the document, along with the URL it came from when it was fetched.
///
/// `None` means the response was not HTML and has been reported.
fn load(source: &str) -> Result<Option<(String, Option<String>)>, Box<dyn std::error::Error>> {
    let url = url::Url::parse(source)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"));

    let Some(url) = url else {
        let path = PathBuf::from(source);
        info!("reading {}", path.display());
        return Ok(Some((std::fs::read_to_string(path)?, None)));
    };

    info!("fetching {url}");
    let client = reqwest::blocking::Client::new();
    let response = client.get(url.clone()).send()?.error_for_status()?;
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    if content_type.is_some_and(|ct| !ct.contains("html") && !ct.contains("xml")) {
        eprintln!("Error: content type is not HTML or XML.");
        return Ok(None);
    }

    Ok(Some((response.text()?, Some(url.to_string()))))
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
