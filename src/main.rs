use allostat::analysis::{self, model::OutcomeTag};
use allostat::classify::ValidatorPolicy;
use allostat::config::{self, AllostatConfig};
use allostat::ingest::{self, Format, IngestOptions};
use allostat::output::json::{self as json_out, AnalysisEnvelope};
use allostat::output::table;
use allostat::report;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "allostat",
    version,
    about = "Allodoct call export analyzer: exam categories, per-tag statistics and reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to config file (default: ~/.allostat/config.toml)
    #[arg(long, global = true, env = "ALLOSTAT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze call exports and optionally write a report
    Analyze {
        /// Export files, directories or glob patterns
        paths: Vec<String>,

        /// Read one export from stdin
        #[arg(long)]
        stdin: bool,

        /// Outcome tag for exports without a Tag column (e.g. exam_not_found)
        #[arg(long)]
        tag: Option<String>,

        /// Force format: csv, json
        #[arg(long)]
        format: Option<String>,

        /// Write the report (one CSV per sheet) into this directory
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Exam validation policy: terms, patterns, modality-anatomy
        #[arg(long)]
        policy: Option<String>,

        /// Exams listed per category in the terminal view
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Load a previously written report and print it
    Import {
        /// Report directory
        dir: PathBuf,

        /// Exams listed per category in the terminal view
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Show how exam labels are normalized, validated and categorized
    Classify {
        /// Exam labels, as the bot wrote them
        #[arg(required = true)]
        labels: Vec<String>,

        /// Exam validation policy: terms, patterns, modality-anatomy
        #[arg(long)]
        policy: Option<String>,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a commented default config if none exists
    Init,
    /// Print the effective config
    Show,
    /// Print the config file location
    Path,
}

fn parse_policy(policy: Option<&str>) -> Result<Option<ValidatorPolicy>> {
    policy
        .map(|p| {
            ValidatorPolicy::from_str(p).with_context(|| {
                format!("Unknown policy: {p}. Use: terms, patterns, modality-anatomy")
            })
        })
        .transpose()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json_output = cli.json;
    let config_file = cli.config.as_deref();

    match cli.command {
        Commands::Analyze {
            paths,
            stdin,
            tag,
            format,
            output,
            policy,
            top,
        } => {
            let cfg = AllostatConfig::load(config_file)?;

            let format_enum = format
                .as_deref()
                .map(|f| {
                    Format::from_str(f)
                        .with_context(|| format!("Unknown format: {f}. Use: csv, json"))
                })
                .transpose()?;
            let tag_enum = tag
                .as_deref()
                .map(|t| {
                    OutcomeTag::from_str(t).with_context(|| {
                        let known: Vec<&str> = OutcomeTag::ALL.iter().map(|t| t.key()).collect();
                        format!("Unknown tag: {t}. Use one of: {}", known.join(", "))
                    })
                })
                .transpose()?;
            let classifier = cfg.classifier(parse_policy(policy.as_deref())?);

            let opts = IngestOptions {
                columns: &cfg.columns,
                tag_override: tag_enum,
                format_override: format_enum,
            };
            let (rows, inputs) = if stdin {
                (ingest::ingest_stdin(&opts)?, vec!["stdin".to_string()])
            } else if paths.is_empty() {
                bail!("No paths provided. Use --stdin to read from stdin.");
            } else {
                (ingest::ingest_paths(&paths, &opts)?, paths)
            };

            let result = analysis::analyze(&rows, &classifier, &cfg.status_filter())?;

            if let Some(dir) = &output {
                report::export_report(&result, dir, cfg.report.sheet_name_max)
                    .with_context(|| format!("Failed to write report to {}", dir.display()))?;
            }

            if json_output {
                let mut envelope =
                    AnalysisEnvelope::new(&inputs, classifier.policy_name(), rows.len(), &result);
                envelope.report_dir = output.as_ref().map(|d| d.display().to_string());
                json_out::print_json(&envelope)?;
            } else {
                println!(
                    "Analyzed {} row{} from {} input{} (policy: {})\n",
                    rows.len(),
                    if rows.len() == 1 { "" } else { "s" },
                    inputs.len(),
                    if inputs.len() == 1 { "" } else { "s" },
                    classifier.policy_name()
                );
                table::print_analysis(&result, top);
                if let Some(dir) = &output {
                    println!("\nReport written to {}", dir.display());
                }
            }
        }

        Commands::Import { dir, top } => {
            let imported = report::import_report(&dir)
                .with_context(|| format!("Failed to import report from {}", dir.display()))?;
            if json_output {
                json_out::print_json(&imported)?;
            } else {
                table::print_import(&imported, top);
            }
        }

        Commands::Classify { labels, policy } => {
            let cfg = AllostatConfig::load(config_file)?;
            let classifier = cfg.classifier(parse_policy(policy.as_deref())?);
            let reports: Vec<_> = labels.iter().map(|l| classifier.explain(l)).collect();
            if json_output {
                json_out::print_json(&serde_json::json!({
                    "policy": classifier.policy_name(),
                    "labels": reports,
                }))?;
            } else {
                table::print_label_reports(&reports, classifier.policy_name());
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Init => {
                let (path, created) = config::init_config(config_file)?;
                if created {
                    println!("Created {}", path.display());
                } else {
                    println!("Config already exists: {}", path.display());
                }
            }
            ConfigAction::Show => {
                let cfg = AllostatConfig::load(config_file)?;
                if json_output {
                    json_out::print_json(&cfg)?;
                } else {
                    println!("{}", cfg.display());
                }
            }
            ConfigAction::Path => {
                let path = match config_file {
                    Some(p) => p.to_path_buf(),
                    None => config::config_path()?,
                };
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}
