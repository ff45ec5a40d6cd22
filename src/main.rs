use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use sieve_rs::engine::{Logic, OperatorKind, RulesEngine, Value};
use sieve_rs::sieve::builder::Builder;
use sieve_rs::sieve::loader::RulesLoader;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the records from a file that match the rules
    Filter {
        /// Rules definition (YAML or JSON)
        #[arg(short, long, env = "SIEVE_RULES")]
        rules: String,

        /// Records file (JSON array, JSON Lines, or YAML sequence)
        #[arg(short, long)]
        input: String,

        /// Override how filters are combined (and/or)
        #[arg(short, long)]
        logic: Option<Logic>,

        /// Fail on type mismatches and bad patterns instead of skipping
        #[arg(long)]
        strict: bool,

        /// Print a pretty JSON array instead of JSON Lines
        #[arg(long)]
        pretty: bool,
    },
    /// Check a single JSON record against the rules
    Check {
        /// Rules definition (YAML or JSON)
        #[arg(short, long, env = "SIEVE_RULES")]
        rules: String,

        /// The record, as a JSON object
        #[arg(long)]
        record: String,

        /// Override how filters are combined (and/or)
        #[arg(short, long)]
        logic: Option<Logic>,

        /// Fail on type mismatches and bad patterns instead of returning false
        #[arg(long)]
        strict: bool,
    },
    /// List the supported operator names
    Operators,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Filter {
            rules,
            input,
            logic,
            strict,
            pretty,
        } => {
            let (engine, def) = Builder::new()
                .build_engine_from_file(&rules)
                .with_context(|| format!("Failed to build rules from {}", rules))?;
            let logic = logic.unwrap_or(def.logic);

            let records = RulesLoader::new()
                .load_records(&input)
                .with_context(|| format!("Failed to load records from {}", input))?;

            let matched = run_filter(&engine, &records, logic, strict)?;
            log::info!("{} of {} records matched", matched.len(), records.len());

            if pretty {
                let out: Vec<serde_json::Value> = matched.into_iter().map(Into::into).collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for record in matched {
                    println!("{}", record);
                }
            }
        }
        Commands::Check {
            rules,
            record,
            logic,
            strict,
        } => {
            let (engine, def) = Builder::new()
                .build_engine_from_file(&rules)
                .with_context(|| format!("Failed to build rules from {}", rules))?;
            let logic = logic.unwrap_or(def.logic);

            let record: Value = serde_json::from_str(&record).context("Record is not valid JSON")?;
            let matched = if strict {
                engine.try_evaluate(&record, logic)?
            } else {
                engine.evaluate(&record, logic)
            };

            println!("{}", matched);
            if !matched {
                std::process::exit(1);
            }
        }
        Commands::Operators => {
            for kind in OperatorKind::ALL {
                println!("{}", kind);
            }
        }
    }

    Ok(())
}

fn run_filter(engine: &RulesEngine, records: &[Value], logic: Logic, strict: bool) -> anyhow::Result<Vec<Value>> {
    if !strict {
        return Ok(engine.filter(records, logic));
    }
    engine.try_filter(records, logic).map_err(|e| {
        log::warn!("Strict evaluation aborted: {}", e);
        e.into()
    })
}
