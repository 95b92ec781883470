//! sqlany - SQL Anywhere adapter CLI
//!
//! Offline tooling around the dialect visitor and type mapper.
//!
//! # Usage
//!
//! ```bash
//! # Render a JSON query tree as SQL Anywhere SQL
//! sqlany translate query.json
//! cat query.json | sqlany translate - --format json
//!
//! # Show the connection string built from sqlany.toml
//! sqlany connstr --config ./sqlany.toml
//!
//! # Type mapping
//! sqlany types
//! sqlany parse-type "numeric(10,2)"
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use sqlany::config::ConnectionConfig;
use sqlany::parser::{parse_connection_string, parse_sql_type};
use sqlany::prelude::*;
use sqlany::types::fetch_type_metadata;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlany")]
#[command(version)]
#[command(about = "SQL Anywhere dialect and type tooling", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlany translate query.json
    sqlany connstr --config ./sqlany.toml
    sqlany parse-type 'long varchar'")]
struct Cli {
    /// Verbose logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON query tree as SQL
    Translate {
        /// Path to the JSON file, or `-` for stdin
        input: String,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the connection string built from configuration
    Connstr {
        /// Config file (default: ./sqlany.toml, then the user config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        show_password: bool,
    },
    /// Show the logical to native column type table
    Types,
    /// Show how a native column type is mapped
    ParseType {
        /// e.g. `varchar(80)` or `numeric(10,2)`
        sql_type: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Translate { input, format } => translate(input, format),
        Commands::Connstr { config, show_password } => connstr(config.as_ref(), *show_password),
        Commands::Types => {
            show_types();
            Ok(())
        }
        Commands::ParseType { sql_type } => parse_type(sql_type),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sqlany=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read query tree from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
    }
}

fn translate(input: &str, format: &OutputFormat) -> Result<()> {
    let content = read_input(input)?;
    let stmt: SelectStatement = serde_json::from_str(&content).context("invalid query tree")?;
    let result = stmt.to_sql_parameterized();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            println!("{}", "SQL:".green().bold());
            println!("{}", result.sql.white());
            if !result.params.is_empty() {
                println!();
                println!("{}", "Binds:".cyan());
                for (i, p) in result.params.iter().enumerate() {
                    println!(
                        "  {} {} {} = {}",
                        format!("#{}", i + 1).dimmed(),
                        p.name.white(),
                        format!("({})", p.logical_type.name()).dimmed(),
                        p.value.to_string().yellow()
                    );
                }
            }
        }
    }
    Ok(())
}

fn connstr(path: Option<&PathBuf>, show_password: bool) -> Result<()> {
    let config = match path {
        Some(p) => ConnectionConfig::load(p)?,
        None => ConnectionConfig::discover()?,
    };
    let cs = config.connection_string()?;
    if show_password {
        println!("{}", cs);
    } else {
        println!("{}", parse_connection_string(&cs)?.masked());
    }
    if let Some(encoding) = config.text_encoding()? {
        println!("{} {:?}", "Encoding:".dimmed(), encoding);
    }
    Ok(())
}

fn show_types() {
    println!(
        "{:14} {:52} {}",
        "Logical".white().bold(),
        "Native".white().bold(),
        "Limit".white().bold()
    );
    println!("{}", "─".repeat(74).dimmed());
    for logical in LogicalType::ALL {
        let (native, limit) = logical.native_default();
        println!(
            "{:14} {:52} {}",
            logical.name().cyan(),
            native.white(),
            limit.map(|l| l.to_string()).unwrap_or_default().dimmed()
        );
    }
}

fn parse_type(sql_type: &str) -> Result<()> {
    let spec = parse_sql_type(sql_type)?;
    let meta = fetch_type_metadata(sql_type)?;

    println!("{} {}", "Type:".dimmed(), spec.name.white());
    if let Some(w) = spec.width {
        println!("{} {}", "Width:".dimmed(), w);
    }
    if let Some(s) = spec.scale {
        println!("{} {}", "Scale:".dimmed(), s);
    }
    println!("{} {}", "Logical:".dimmed(), meta.logical.name().cyan().bold());
    for (label, value) in [("Limit:", meta.limit), ("Precision:", meta.precision), ("Scale:", meta.scale)] {
        if let Some(v) = value {
            println!("  {} {}", label.dimmed(), v);
        }
    }
    println!(
        "{} {}",
        "Column SQL:".dimmed(),
        type_to_sql(meta.logical, meta.limit, meta.precision, meta.scale).green()
    );
    Ok(())
}
