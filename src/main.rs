use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kodeq_core::{all_types, create_object, ChannelSink, Environment, RuntimeConfig, SnapshotRow};
use kodeq_expr::{parse_literal, to_binary_string, to_hex_string, Evaluator};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kodeq")]
#[command(about = "Evaluate KODEQ expressions and run objects tick by tick", long_about = None)]
struct Cli {
    /// JSON runtime config (seed, log_diagnostics)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for RND and random modules; overrides the config file
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression
    Eval {
        expression: String,

        /// Value of the tick counter T
        #[arg(short, long, default_value = "0")]
        tick: u8,

        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// Show a literal in decimal, binary and hex
    Literal { text: String },
    /// Bind objects, set attributes and run a number of ticks
    Run {
        /// Bind a fresh object: NAME=TYPE (e.g. beat=EUC)
        #[arg(short, long = "bind", value_parser = parse_pair::<'='>)]
        bind: Vec<(String, String)>,

        /// Set an attribute from an expression: NAME.ATTR=EXPR
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<Assignment>,

        /// Queue a method call before the first tick: NAME.METHOD
        #[arg(long = "call", value_parser = parse_pair::<'.'>)]
        call: Vec<(String, String)>,

        /// Number of ticks to run
        #[arg(short, long, default_value = "16")]
        ticks: usize,

        /// Print MIDI messages as they are sent
        #[arg(long)]
        midi: bool,

        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// List every object and module type
    Types,
    /// Show the attributes and default state of a type
    Inspect { type_name: String },
}

#[derive(Clone)]
struct Assignment {
    name: String,
    attribute: String,
    expression: String,
}

fn parse_pair<const SEP: char>(text: &str) -> Result<(String, String), String> {
    match text.split_once(SEP) {
        Some((left, right)) if !left.is_empty() && !right.is_empty() => {
            Ok((left.to_string(), right.to_string()))
        }
        _ => Err(format!("expected LEFT{}RIGHT, got '{}'", SEP, text)),
    }
}

fn parse_assignment(text: &str) -> Result<Assignment, String> {
    let (target, expression) = parse_pair::<'='>(text)?;
    let (name, attribute) = parse_pair::<'.'>(&target)?;
    Ok(Assignment {
        name,
        attribute,
        expression,
    })
}

#[derive(Serialize)]
struct TickRow {
    tick: i32,
    values: Vec<SnapshotRow>,
    midi: Vec<String>,
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Eval {
            expression,
            tick,
            format,
        } => {
            let mut env = Environment::with_config(&config);
            env.run(usize::from(tick));
            let mut evaluator = Evaluator::new(&mut env).with_logging(config.log_diagnostics);
            let value = evaluator.evaluate(&expression);
            let diagnostics = evaluator.take_diagnostics();

            match format {
                Format::Json => {
                    let result = kodeq_expr::Evaluation { value, diagnostics };
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                Format::Text => {
                    println!("{}", value);
                    for diagnostic in &diagnostics {
                        eprintln!("warning: {}", diagnostic);
                    }
                }
            }
        }
        Commands::Literal { text } => {
            let Some(value) = parse_literal(&text) else {
                bail!("'{}' is not a decimal, #binary or Xhex literal", text);
            };
            println!("{}", value);
            println!("{}", to_binary_string(value));
            println!("{}", to_hex_string(value));
        }
        Commands::Run {
            bind,
            set,
            call,
            ticks,
            midi,
            format,
        } => {
            let (sink, messages) = ChannelSink::unbounded();
            let mut env = Environment::with_config(&config).with_sink(sink);

            for (name, type_name) in &bind {
                env.create(name, type_name)
                    .with_context(|| format!("Failed to bind ${}", name))?;
            }
            for assignment in &set {
                let value = Evaluator::new(&mut env)
                    .with_logging(config.log_diagnostics)
                    .evaluate(&assignment.expression);
                env.set_attribute(&assignment.name, &assignment.attribute, value.into())
                    .with_context(|| {
                        format!("Failed to set ${}.{}", assignment.name, assignment.attribute)
                    })?;
            }
            for (name, method) in &call {
                env.invoke(name, method)
                    .with_context(|| format!("Failed to call ${}.{}", name, method))?;
            }

            let mut rows = Vec::with_capacity(ticks);
            for _ in 0..ticks {
                env.tick();
                let sent: Vec<String> = messages.try_iter().map(|m| m.to_string()).collect();
                rows.push(TickRow {
                    tick: env.tick_count(),
                    values: env.snapshot(),
                    midi: if midi { sent } else { Vec::new() },
                });
            }

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                Format::Text => {
                    for row in &rows {
                        let values: Vec<String> = row
                            .values
                            .iter()
                            .map(|v| format!("${}={}", v.name, v.value))
                            .collect();
                        println!("{:>3}  {}", row.tick, values.join("  "));
                        for message in &row.midi {
                            println!("     > {}", message);
                        }
                    }
                }
            }
        }
        Commands::Types => {
            for type_name in all_types() {
                let object = create_object(type_name)?;
                println!("{:<10} {}", type_name, object.attributes().join(", "));
            }
        }
        Commands::Inspect { type_name } => {
            let object = create_object(&type_name)?;
            println!("{}", object.render());
            println!();
            for attribute in object.attributes() {
                println!("  {:<14} {}", attribute, object.get(attribute)?);
            }
        }
    }

    Ok(())
}
