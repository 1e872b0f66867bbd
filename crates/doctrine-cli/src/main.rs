use clap::{Parser, Subcommand};
use doctrine_core::{
    run_audit, DoctrineConfig, DriftRank, ExpansionController, ExpansionStatus, IdentityGate,
    PerceptionSmoother, ShapeError, Vector,
};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Doctrine CLI - Möbius Lock audit and identity checks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML if it ends in .toml, JSON otherwise)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the doctrine audit (safe expansion vs. identity creep)
    Audit {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate one candidate against a state and an origin anchor
    Check {
        /// Origin anchor, e.g. "1,0,0"
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        origin: Vector,

        /// Current state (defaults to the origin)
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        state: Option<Vector>,

        /// Candidate vector
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        candidate: Vector,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Feed candidates through the expansion controller and perception layer
    Process {
        /// Origin anchor, e.g. "1,0,0"
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        origin: Vector,

        /// Initial state (defaults to the origin)
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        state: Option<Vector>,

        /// Candidate vector; repeat to process a sequence
        #[arg(long = "candidate", value_parser = parse_vector, allow_hyphen_values = true, required = true)]
        candidates: Vec<Vector>,

        /// User distress signal
        #[arg(long, default_value_t = 0.0)]
        distress: f64,

        /// Context stability signal
        #[arg(long, default_value_t = 1.0)]
        stability: f64,
    },

    /// Write the default configuration as TOML
    InitConfig {
        /// Destination file
        #[arg(short, long, default_value = "doctrine.toml")]
        output: PathBuf,
    },
}

fn parse_vector(input: &str) -> Result<Vector, ShapeError> {
    Vector::parse(input)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

/// Execute a parsed command, writing its report to `out`
fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => {
            let config = DoctrineConfig::from_file(path)?;
            tracing::info!("Loaded configuration from {}", path.display());
            config
        }
        None => DoctrineConfig::default(),
    };

    match cli.command {
        Commands::Audit { json } => {
            let report = run_audit(&config)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                for case in &report.cases {
                    writeln!(out, "{case}")?;
                }
            }
            if !report.passed {
                tracing::warn!("Audit {} failed", report.report_id);
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Check {
            origin,
            state,
            candidate,
            json,
        } => {
            let state = state.unwrap_or_else(|| origin.clone());
            let gate = IdentityGate::with_config(origin, state, &config.gate)?;
            let verdict = gate.validate(&candidate)?;
            let rank = DriftRank::from_severity(verdict.severity.value());

            if json {
                let value = serde_json::json!({
                    "candidate": candidate,
                    "verdict": verdict,
                    "rank": rank,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
            } else {
                writeln!(out, "CANDIDATE: {candidate}")?;
                writeln!(out, "VALID:     {}", verdict.is_valid)?;
                writeln!(out, "SEVERITY:  {} ({rank})", verdict.severity)?;
                writeln!(out, "COSINE:    {:.4}", verdict.metrics.cosine)?;
                writeln!(out, "RADIAL:    {:.4}", verdict.metrics.radial)?;
            }
        }
        Commands::Process {
            origin,
            state,
            candidates,
            distress,
            stability,
        } => {
            let state = state.unwrap_or_else(|| origin.clone());
            let dimension = origin.dimension();
            let mut controller = ExpansionController::with_config(origin, state, &config)?;
            let mut smoother = PerceptionSmoother::with_config(dimension, &config.perception)?;

            for candidate in &candidates {
                let outcome = controller.process(candidate, distress)?;
                let shown = if outcome.status == ExpansionStatus::EmergencyAscentActive
                    && outcome.vector.dimension() != smoother.vector_dim()
                {
                    // Bypass skips shape checks; the window only holds `dimension`-sized samples
                    tracing::warn!(
                        "Bypassed candidate has dimension {}, perception expects {}",
                        outcome.vector.dimension(),
                        smoother.vector_dim()
                    );
                    outcome.vector.clone()
                } else {
                    smoother.perceptual_output(&outcome.vector, stability, distress)?
                };
                writeln!(
                    out,
                    "{:<24} severity={} ({}) vector={} display={}",
                    outcome.status,
                    outcome.severity,
                    smoother.rank_label(outcome.severity.value()),
                    outcome.vector,
                    shown
                )?;
            }

            let gate = controller.gate();
            writeln!(
                out,
                "STATE: {} (history: {}, accepted: {})",
                gate.current_state(),
                gate.history().len(),
                gate.accepted_count()
            )?;
        }
        Commands::InitConfig { output } => {
            DoctrineConfig::default().to_file(&output)?;
            tracing::info!("Wrote default configuration to {}", output.display());
            writeln!(out, "Wrote default configuration to {:?}", output)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}
