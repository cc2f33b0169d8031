use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tally_core::{Ledger, YearMonth};
use tally_finance::{matching_rule, LedgerPipeline, LedgerSource, PipelineOutput};
use tally_ingest::{infer_roles, RawTable};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Normalize and categorize bank statement exports")]
struct Cli {
    /// Config file (default: ~/.tally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the normalized ledger, newest first
    Show {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// Net balance, income, expenses, daily flow and spending by category
    Summary {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List the months present in the ledger, newest first
    Months {
        #[command(flatten)]
        source: CsvArg,
    },

    /// Show which columns were picked for each role
    Columns {
        /// Statement CSV to inspect
        csv: PathBuf,
    },

    /// Show the category a description would get
    Explain { description: String },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(clap::Args, Debug)]
struct CsvArg {
    /// Statement CSV (defaults to the configured local statement, then sample data)
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    #[command(flatten)]
    source: CsvArg,

    /// Only rows from this month (YYYY-MM)
    #[arg(long)]
    month: Option<YearMonth>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Csv,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;
    init_tracing(&cfg, cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Show { input, format } => {
            let ledger = load_ledger(&cfg, &input)?;
            let ordered = ledger.display_order(&cfg.display.priority_phrase);
            match format {
                Format::Table => {
                    render::write_table(&mut out, &ordered, &cfg.display.currency_suffix)?
                }
                Format::Csv => render::write_csv(&mut out, &ordered)?,
                Format::Json => render::write_json(&mut out, &ordered)?,
            }
        }

        Command::Summary { input } => {
            let ledger = load_ledger(&cfg, &input)?;
            render::write_summary(&mut out, &ledger, &cfg.display.currency_suffix)?;
        }

        Command::Months { source } => {
            let output = run_pipeline(&cfg, source.csv)?;
            for month in output.ledger.months() {
                writeln!(out, "{month}")?;
            }
        }

        Command::Columns { csv } => {
            let table = RawTable::from_path(&csv, cfg.delimiter()?)
                .with_context(|| format!("reading {}", csv.display()))?;
            let roles = infer_roles(table.headers());
            serde_json::to_writer_pretty(&mut out, &roles)?;
            writeln!(out)?;
        }

        Command::Explain { description } => match matching_rule(Some(description.as_str())) {
            Some(rule) => writeln!(out, "{} (rule: {:?})", rule.label, rule.trigger)?,
            None => writeln!(out, "{} (no rule matched)", tally_core::OTHER_CATEGORY)?,
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let s = toml::to_string_pretty(&cfg).context("serialize config")?;
                write!(out, "{s}")?;
            }
        },
    }

    Ok(())
}

fn init_tracing(cfg: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log.level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// An explicit --csv must be readable; otherwise the pipeline picks the source.
fn run_pipeline(cfg: &Config, csv: Option<PathBuf>) -> Result<PipelineOutput> {
    let upload = csv
        .map(|path| {
            RawTable::from_path(&path, cfg.delimiter()?)
                .with_context(|| format!("reading {}", path.display()))
        })
        .transpose()?;

    let pipeline = LedgerPipeline::new(cfg.pipeline_options()?);
    let output = pipeline.run(upload);
    debug!(source = ?output.source, rows = output.ledger.len(), "pipeline finished");

    if output.source == LedgerSource::Sample {
        eprintln!("No statement found; showing built-in sample data (pass --csv <file>)");
    }
    if !output.rejected.is_empty() {
        eprintln!(
            "Skipped {} row(s) with unreadable dates (first: line {}, {:?})",
            output.rejected.len(),
            output.rejected[0].line,
            output.rejected[0].date_text
        );
    }
    Ok(output)
}

fn load_ledger(cfg: &Config, input: &InputArgs) -> Result<Ledger> {
    let output = run_pipeline(cfg, input.source.csv.clone())?;
    Ok(match input.month {
        Some(month) => output.ledger.for_month(month),
        None => output.ledger,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_csv_arg_shared_by_input_commands() {
        let cli = Cli::try_parse_from(["tally", "months", "--csv", "a.csv"]).unwrap();
        match cli.command {
            Command::Months { source } => assert_eq!(source.csv, Some(PathBuf::from("a.csv"))),
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from(["tally", "summary", "--csv", "b.csv", "--month", "2023-12"])
            .unwrap();
        match cli.command {
            Command::Summary { input } => {
                assert_eq!(input.source.csv, Some(PathBuf::from("b.csv")));
                assert_eq!(input.month, Some(YearMonth::new(2023, 12).unwrap()));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
