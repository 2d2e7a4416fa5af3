//! Bioregistry CLI - query prefixes, CURIEs and IRIs
//!
//! Usage:
//!     bioregistry normalize-prefix taxonomy
//!     bioregistry parse-iri http://purl.obolibrary.org/obo/CHEBI_24867
//!     bioregistry get-iri chebi:24867 --priority obofoundry,default
//!     bioregistry --data registry.json --json providers pmid:16333295
//!
//! The dataset comes from `--data`, then `BIOREGISTRY_DATA`, then a
//! `bioregistry.json` in the working directory or `data/`.

use std::path::PathBuf;
use std::process::ExitCode;

use bioregistry_core::{
    Dataset, LinkSource, PrefixOverrides, RegistryIndex, ResolverConfig, SnapshotLoader,
    SnapshotValidator,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "bioregistry")]
#[command(about = "Normalize prefixes and convert between CURIEs and IRIs")]
#[command(version)]
struct Args {
    /// Path to the dataset JSON (default: $BIOREGISTRY_DATA or ./bioregistry.json)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Resolver configuration as JSON, or a path to a JSON file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lint the dataset
    Validate,

    #[command(flatten)]
    Query(Query),
}

#[derive(Subcommand, Debug)]
enum Query {
    /// Map a prefix or synonym to its canonical prefix
    NormalizePrefix { prefix: String },

    /// Split a CURIE into canonical prefix and identifier
    ParseCurie { curie: String },

    /// Re-render a CURIE in canonical form
    NormalizeCurie {
        curie: String,

        /// Use the preferred prefix instead of the canonical one
        #[arg(long)]
        preferred: bool,
    },

    /// Resolve an IRI to a CURIE
    ParseIri {
        iri: String,

        /// Prefix override as prefix=uri_prefix (repeatable)
        #[arg(long = "override", value_parser = parse_override)]
        overrides: Vec<(String, String)>,
    },

    /// Render a CURIE as an IRI
    GetIri {
        curie: String,

        /// Comma-separated source priority (e.g. obofoundry,default)
        #[arg(long)]
        priority: Option<String>,

        /// Prefix override as prefix=uri_prefix (repeatable)
        #[arg(long = "override", value_parser = parse_override)]
        overrides: Vec<(String, String)>,
    },

    /// List every resolvable URL for a CURIE
    Providers { curie: String },

    /// Export the prefix map
    PrefixMap {
        /// Comma-separated source priority
        #[arg(long)]
        priority: Option<String>,
    },
}

fn parse_override(pair: &str) -> Result<(String, String), String> {
    PrefixOverrides::parse_pair(pair).ok_or_else(|| format!("expected prefix=uri, got '{}'", pair))
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bioregistry=info,bioregistry_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns `Ok(false)` on a miss
fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let dataset = load_dataset(args.data.clone())?;

    let query = match args.command {
        Command::Validate => return Ok(validate(&dataset, args.json)),
        Command::Query(query) => query,
    };

    let config = match &args.config {
        Some(raw) => load_config(raw)?,
        None => ResolverConfig::default(),
    };
    let index = RegistryIndex::build(dataset, config)?;

    let found = match query {
        Query::NormalizePrefix { prefix } => {
            let canonical = index.normalize_prefix(&prefix);
            emit(args.json, json!({"input": prefix, "prefix": canonical}), canonical)
        }
        Query::ParseCurie { curie } => match index.try_parse_curie(&curie) {
            Ok(reference) => {
                let text = format!("{}\t{}", reference.prefix, reference.identifier);
                emit(args.json, json!(reference), Some(text.as_str()))
            }
            Err(e) => emit_miss(args.json, json!(e.to_error_response()), &e.to_string()),
        },
        Query::NormalizeCurie { curie, preferred } => {
            let normalized = if preferred {
                index.standardize_curie(&curie)
            } else {
                index.normalize_curie(&curie)
            };
            emit(args.json, json!({"input": curie, "curie": normalized}), normalized.as_deref())
        }
        Query::ParseIri { iri, overrides } => {
            let overrides: PrefixOverrides = overrides.into_iter().collect();
            let resolution = index.resolve_iri(&iri, Some(&overrides));
            match resolution.ambiguity(&iri) {
                Some(e) => emit_miss(args.json, json!(e.to_error_response()), &e.to_string()),
                None => {
                    let curie = resolution.reference().map(|r| r.to_string());
                    emit(args.json, json!({"input": iri, "curie": curie}), curie.as_deref())
                }
            }
        }
        Query::GetIri {
            curie,
            priority,
            overrides,
        } => {
            let overrides: PrefixOverrides = overrides.into_iter().collect();
            let priority = priority.as_deref().map(LinkSource::parse_list);
            let result = index.try_parse_curie(&curie).and_then(|reference| {
                index.try_get_iri(
                    &reference.prefix,
                    &reference.identifier,
                    priority.as_deref(),
                    Some(&overrides),
                )
            });
            match result {
                Ok(iri) => emit(args.json, json!({"input": curie, "iri": iri}), Some(iri.as_str())),
                Err(e) => emit_miss(args.json, json!(e.to_error_response()), &e.to_string()),
            }
        }
        Query::Providers { curie } => match index.try_parse_curie(&curie) {
            Ok(reference) => {
                let links: Vec<(String, String)> = index
                    .get_providers(&reference.prefix, &reference.identifier)
                    .collect();
                if args.json {
                    let map: serde_json::Map<String, serde_json::Value> = links
                        .into_iter()
                        .map(|(metaprefix, url)| (metaprefix, json!(url)))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&map)?);
                } else {
                    for (metaprefix, url) in &links {
                        println!("{}\t{}", metaprefix, url);
                    }
                }
                true
            }
            Err(e) => emit_miss(args.json, json!(e.to_error_response()), &e.to_string()),
        },
        Query::PrefixMap { priority } => {
            let priority = priority.as_deref().map(LinkSource::parse_list);
            let map = index.get_prefix_map(priority.as_deref());
            if args.json {
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                for (prefix, uri_prefix) in &map {
                    println!("{}\t{}", prefix, uri_prefix);
                }
            }
            true
        }
    };

    Ok(found)
}

fn load_dataset(path: Option<PathBuf>) -> Result<Dataset, Box<dyn std::error::Error>> {
    // Linting is left to the `validate` subcommand and index build
    let loader = SnapshotLoader::new().skip_validation();

    let path = path.or_else(|| std::env::var("BIOREGISTRY_DATA").ok().map(PathBuf::from));
    let loaded = match path {
        Some(path) => loader.load_from_file(path)?,
        None => loader
            .with_search_path(PathBuf::from("."))
            .with_search_path(PathBuf::from("data"))
            .load_discovered()?,
    };

    if let Some(source) = &loaded.source_path {
        tracing::debug!("Loaded dataset from {}", source.display());
    }
    Ok(loaded.dataset)
}

fn load_config(raw: &str) -> Result<ResolverConfig, Box<dyn std::error::Error>> {
    if raw.trim_start().starts_with('{') {
        return Ok(ResolverConfig::from_json(raw)?);
    }
    let content = std::fs::read_to_string(raw)?;
    Ok(ResolverConfig::from_json(&content)?)
}

fn validate(dataset: &Dataset, as_json: bool) -> bool {
    let report = SnapshotValidator::new().validate(dataset);

    if as_json {
        let issues = |level: &str, list: &[bioregistry_core::ValidationIssue]| {
            list.iter()
                .map(|issue| {
                    json!({
                        "level": level,
                        "code": issue.code,
                        "message": issue.message,
                        "path": issue.path,
                        "suggestion": issue.suggestion,
                    })
                })
                .collect::<Vec<_>>()
        };
        let mut all = issues("error", &report.errors);
        all.extend(issues("warning", &report.warnings));
        all.extend(issues("info", &report.info));
        println!(
            "{}",
            json!({"valid": report.is_valid, "summary": report.summary(), "issues": all})
        );
    } else {
        for issue in report.errors.iter().chain(&report.warnings).chain(&report.info) {
            println!("{}", issue);
            if let Some(suggestion) = &issue.suggestion {
                println!("    suggestion: {}", suggestion);
            }
        }
        println!("{}", report.summary());
    }

    report.is_valid
}

fn emit(as_json: bool, value: serde_json::Value, text: Option<&str>) -> bool {
    if as_json {
        println!("{}", value);
    } else if let Some(text) = text {
        println!("{}", text);
    }
    text.is_some()
}

fn emit_miss(as_json: bool, value: serde_json::Value, message: &str) -> bool {
    if as_json {
        println!("{}", value);
    } else {
        eprintln!("{}", message);
    }
    false
}
