//! Provenance CLI: inspect, query and convert image attribution RDF
//!
//! Reads RDF/XML files (or XMP packets with `--xmp`) through the
//! provenance-rdf library.

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use provenance_rdf::rdf::serialization::{self, SerializerConfig};
use provenance_rdf::{Attribution, MemoryTagStore, Node, QueryEngine, TagStore, Vocab};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "provenance-cli", version, about = "Image provenance RDF tool")]
struct Cli {
    /// Treat input files as XMP packets, sourced from this base URI
    #[arg(long, global = true, value_name = "BASE_URI")]
    xmp: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the attribution tree rooted at about:this
    Show {
        file: PathBuf,
    },
    /// Report whether attribution data is present
    Check {
        file: PathBuf,
    },
    /// Run a SPARQL SELECT query
    Query {
        file: PathBuf,

        /// The SPARQL query string
        sparql: String,
    },
    /// Re-serialize as RDF/XML
    Convert {
        file: PathBuf,

        /// JSON serializer settings (base_uri, prefixes, ...)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Export creators and sources as XMP tags
    Tags {
        file: PathBuf,

        /// Also copy the declared source's Dublin Core metadata
        #[arg(long)]
        source: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let xmp = cli.xmp.as_deref();

    let result = match &cli.command {
        Commands::Show { file } => run_show(file, xmp, &cli.format),
        Commands::Check { file } => run_check(file, xmp, &cli.format),
        Commands::Query { file, sparql } => run_query(file, xmp, sparql, &cli.format),
        Commands::Convert { file, config } => run_convert(file, xmp, config.as_deref()),
        Commands::Tags { file, source } => run_tags(file, xmp, *source, &cli.format),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load(file: &Path, xmp: Option<&str>) -> anyhow::Result<Attribution> {
    let mut attribution = Attribution::new();
    match xmp {
        Some(base_uri) => {
            let packet = std::fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            attribution.load_from_xmp(&packet, base_uri)?;
        }
        None => attribution
            .load_from_file(file)
            .with_context(|| format!("loading {}", file.display()))?,
    }
    debug!("Loaded {} statements from {}", attribution.model().len(), file.display());
    Ok(attribution)
}

fn run_show(file: &Path, xmp: Option<&str>, format: &OutputFormat) -> anyhow::Result<()> {
    let attribution = load(file, xmp)?;
    let tree = attribution.tree(&Vocab::new())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
        _ => print!("{}", tree),
    }
    Ok(())
}

fn run_check(file: &Path, xmp: Option<&str>, format: &OutputFormat) -> anyhow::Result<()> {
    let attribution = load(file, xmp)?;
    let has_attribution = attribution.has_attribution();

    match format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "has_attribution": has_attribution,
                "statements": attribution.model().len(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("Statements:  {}", attribution.model().len());
            println!("Attribution: {}", if has_attribution { "yes" } else { "no" });
        }
    }
    Ok(())
}

fn run_query(
    file: &Path,
    xmp: Option<&str>,
    sparql: &str,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let attribution = load(file, xmp)?;
    let results = QueryEngine::new()
        .query(attribution.model(), sparql)?
        .into_results()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results.to_json())?);
        }
        OutputFormat::Csv => {
            println!("{}", results.variables.join(","));
            for solution in &results.solutions {
                let cells: Vec<String> = results
                    .variables
                    .iter()
                    .map(|v| format_csv_value(&format_node(solution.get(v))))
                    .collect();
                println!("{}", cells.join(","));
            }
        }
        OutputFormat::Table => {
            if results.variables.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(&results.variables);

            for solution in &results.solutions {
                let cells: Vec<String> = results
                    .variables
                    .iter()
                    .map(|v| format_node(solution.get(v)))
                    .collect();
                table.add_row(cells);
            }

            println!("{}", table);
            println!("{} row(s)", results.solutions.len());
        }
    }
    Ok(())
}

fn run_convert(file: &Path, xmp: Option<&str>, config: Option<&Path>) -> anyhow::Result<()> {
    let attribution = load(file, xmp)?;

    let config = match config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            SerializerConfig::from_json(&json)?
        }
        None => SerializerConfig::default(),
    };

    print!("{}", serialization::serialize(attribution.model(), &config)?);
    Ok(())
}

fn run_tags(
    file: &Path,
    xmp: Option<&str>,
    source: bool,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let attribution = load(file, xmp)?;
    let mut tags = MemoryTagStore::new();

    attribution.write_metadata(&mut tags)?;
    if source && !attribution.write_source_metadata(&mut tags)? {
        eprintln!("No dc:source declared; skipping source metadata");
    }

    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Tag", "Values"]);
            for (tag, _) in tags.iter() {
                table.add_row(vec![tag.to_string(), tags.get_tag_string(tag).unwrap_or_default()]);
            }
            println!("{}", table);
        }
        _ => println!("{}", serde_json::to_string_pretty(&tags)?),
    }
    Ok(())
}

fn format_node(node: Option<&Node>) -> String {
    match node {
        None => String::new(),
        Some(Node::Resource(uri)) => uri.as_str().to_string(),
        Some(Node::Literal(literal)) => literal.value().to_string(),
        Some(Node::Blank(blank)) => format!("_:{}", blank.as_str()),
    }
}

fn format_csv_value(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
