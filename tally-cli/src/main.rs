use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tally_core::{ClassificationInput, Direction, Taxonomy};
use tally_finance::{Classifier, DEFAULT_RULES_TOML, RuleFile, load_classifier, summarize};
use tally_ingest::parse_statement_csv;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod output;
mod state;

use config::Config;
use output::ClassifiedRow;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Rule-based transaction categorizer")]
struct Cli {
    /// Rule file to use instead of the configured or embedded tables
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a single transaction description
    Classify {
        description: String,

        /// Signed amount; negative = outgoing when no direction is given
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,

        /// credit or debit
        #[arg(long)]
        direction: Option<Direction>,
    },

    /// Classify every row of a statement CSV (date,description,amount[,direction])
    Batch {
        #[arg(long)]
        csv: PathBuf,
    },

    /// List the category taxonomy
    Categories,

    /// Manage the rule file
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },

    /// Write a default config.toml to the tally home directory
    InitConfig,
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Write the embedded default rules to <home>/rules.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a rule file (defaults to the active one)
    Check { path: Option<PathBuf> },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_logging(&cfg.log.filter);

    let json = cli.json || cfg.output.json;

    match cli.command {
        Command::Classify {
            description,
            amount,
            direction,
        } => {
            let classifier = active_classifier(cli.rules, &cfg)?;
            let result = classifier.classify(&description, amount, direction);
            output::print_single(
                &ClassifiedRow {
                    date: None,
                    description: &description,
                    amount,
                    direction,
                    result: &result,
                },
                json,
            )?;
        }

        Command::Batch { csv } => {
            if !csv.exists() {
                bail!("CSV not found: {}", csv.display());
            }
            let classifier = active_classifier(cli.rules, &cfg)?;
            let txns = parse_statement_csv(&csv)?;
            let inputs: Vec<ClassificationInput> = txns.iter().map(|t| t.to_input()).collect();
            let results = classifier.classify_batch(&inputs);
            let summary = summarize(&inputs, &results);
            output::print_batch(&txns, &results, &summary, &Taxonomy::builtin(), json)?;
        }

        Command::Categories => {
            output::print_categories(&Taxonomy::builtin(), json)?;
        }

        Command::Rules { command } => match command {
            RulesCommand::Init { force } => init_rules(force)?,
            RulesCommand::Check { path } => {
                let path = match path.or(cli.rules) {
                    Some(p) => Some(p),
                    None => configured_rules_path(&cfg)?,
                };
                check_rules(path)?;
            }
        },

        Command::InitConfig => config::init_config()?,
    }

    Ok(())
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_env("TALLY_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Flag > config > `<home>/rules.toml` if present > embedded defaults.
fn active_classifier(flag: Option<PathBuf>, cfg: &Config) -> Result<Classifier> {
    let path = match flag {
        Some(p) => Some(p),
        None => configured_rules_path(cfg)?,
    };
    debug!(path = ?path, "selecting rule file");
    load_classifier(path.as_deref())
}

fn configured_rules_path(cfg: &Config) -> Result<Option<PathBuf>> {
    if let Some(p) = &cfg.rules.path {
        return Ok(Some(p.clone()));
    }
    let home_rules = state::rules_path()?;
    Ok(home_rules.exists().then_some(home_rules))
}

fn init_rules(force: bool) -> Result<()> {
    state::ensure_tally_home()?;
    let p = state::rules_path()?;
    if p.exists() && !force {
        println!("Rules already exist: {} (pass --force to overwrite)", p.display());
        return Ok(());
    }
    fs::write(&p, DEFAULT_RULES_TOML).with_context(|| format!("write {}", p.display()))?;
    println!("Wrote {}", p.display());
    Ok(())
}

fn check_rules(path: Option<PathBuf>) -> Result<()> {
    let (label, file) = match path {
        Some(p) => (p.display().to_string(), RuleFile::load(&p)?),
        None => (
            "embedded defaults".to_string(),
            RuleFile::builtin().context("parse embedded default rules")?,
        ),
    };
    let (income, expense) = (file.income.len(), file.expense.len());
    file.into_classifier(&Taxonomy::builtin())
        .with_context(|| format!("validate {label}"))?;
    println!("OK: {label} ({income} income rules, {expense} expense rules)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_negative_amount_and_direction() {
        let cli = Cli::try_parse_from([
            "tally",
            "classify",
            "MERCADONA MADRID",
            "--amount",
            "-45.30",
            "--direction",
            "debit",
        ])
        .unwrap();
        match cli.command {
            Command::Classify {
                description,
                amount,
                direction,
            } => {
                assert_eq!(description, "MERCADONA MADRID");
                assert_eq!(amount, -45.30);
                assert_eq!(direction, Some(Direction::Debit));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_direction() {
        let err = Cli::try_parse_from([
            "tally",
            "classify",
            "X",
            "--amount",
            "1",
            "--direction",
            "sideways",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tally", "categories", "--json", "--rules", "r.toml"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.rules, Some(PathBuf::from("r.toml")));
    }

    #[test]
    fn test_explicit_flag_wins_over_config() {
        let dir = tempfile::tempdir().unwrap();
        let flagged = dir.path().join("flag.toml");
        fs::write(
            &flagged,
            "version = 1\n[[expense]]\nkeywords = [\"lidl\"]\ncategory = \"shopping\"\n",
        )
        .unwrap();
        let cfg = Config {
            rules: config::RulesSection {
                path: Some(dir.path().join("missing.toml")),
            },
            ..Default::default()
        };
        let classifier = active_classifier(Some(flagged), &cfg).unwrap();
        let r = classifier.classify("lidl", -3.0, None);
        assert_eq!(r.category, tally_core::CategoryId::Shopping);
    }

    #[test]
    fn test_check_rules_accepts_embedded_defaults() {
        check_rules(None).unwrap();
    }
}
