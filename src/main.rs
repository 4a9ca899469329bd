//! VectorPerf CLI

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use vectorperf::bench::{cases, verify_cases, Section};
use vectorperf::{BenchConfig, CpuCapabilities, SuiteRunner};

#[derive(Parser)]
#[command(name = "vectorperf")]
#[command(about = "Adaptive micro-benchmarks for 2D/4D vector representations", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/vectorperf/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark suite
    Run {
        /// Only run cases whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,

        #[command(flatten)]
        overrides: Overrides,

        /// Write the JSON report here
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// List benchmark cases in run order
    List,

    /// Run each case once and check its output
    Verify {
        /// Vectors per buffer
        #[arg(long)]
        array_size: Option<usize>,
    },

    /// Show CPU/SIMD capabilities
    Cpu,

    /// Show effective configuration
    Config {
        /// Save it to the default config path
        #[arg(long)]
        write: bool,
    },
}

#[derive(Args)]
struct Overrides {
    /// Vectors per buffer
    #[arg(long)]
    array_size: Option<usize>,

    /// Loop count of the first timed pass
    #[arg(long)]
    initial_loops: Option<u64>,

    /// Loop count ceiling
    #[arg(long)]
    max_loops: Option<u64>,

    /// Minimum timed pass duration in seconds
    #[arg(long)]
    min_secs: Option<f64>,

    /// Pause after each case in milliseconds
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Pause before the first case in milliseconds
    #[arg(long)]
    start_delay_ms: Option<u64>,
}

impl Overrides {
    fn apply(&self, config: &mut BenchConfig) {
        if let Some(v) = self.array_size {
            config.array_size = v;
        }
        if let Some(v) = self.initial_loops {
            config.initial_loops = v;
        }
        if let Some(v) = self.max_loops {
            config.max_loops = v;
        }
        if let Some(v) = self.min_secs {
            config.min_duration_secs = v;
        }
        if let Some(v) = self.pause_ms {
            config.pause_ms = v;
        }
        if let Some(v) = self.start_delay_ms {
            config.start_delay_ms = v;
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<BenchConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => BenchConfig::load(path)?,
        None => BenchConfig::load_or_default()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Run { filter, overrides, json } => {
            overrides.apply(&mut config);
            config.validate()?;

            let caps = CpuCapabilities::detect();
            if caps.lanes_underused() {
                warn!(
                    host_bits = caps.simd_register_bits(),
                    "HwVector is narrower than the host's SIMD registers"
                );
            }

            let mut runner = SuiteRunner::new(config);
            if let Some(filter) = filter {
                runner = runner.with_filter(filter);
            }
            // Fail on a bad filter before waiting
            runner.selected_cases()?;

            tokio::time::sleep(runner.config().start_delay()).await;
            let report = runner.run_async().await?;

            for best in report.fastest_per_section() {
                info!(
                    section = %best.section,
                    seconds = best.seconds_per_iteration,
                    "Fastest: {}",
                    best.name
                );
            }

            if let Some(path) = json {
                report.save_json(&path)?;
                info!("Report written to {}", path.display());
            }
        }

        Commands::List => {
            let mut section: Option<Section> = None;
            for case in cases::CASES {
                if section != Some(case.section) {
                    println!("[{}]", case.section);
                    section = Some(case.section);
                }
                println!("  {}", case.name);
            }
        }

        Commands::Verify { array_size } => {
            if let Some(n) = array_size {
                config.array_size = n;
            }
            let outcomes = verify_cases(&config, &cases::select(None))?;

            let width = outcomes.iter().map(|o| o.name.len()).max().unwrap_or(0);
            let mut failed = 0;
            for outcome in &outcomes {
                match &outcome.failure {
                    None => println!("{:>width$}  ok ({} vectors)", outcome.name, outcome.checked),
                    Some(msg) => {
                        failed += 1;
                        println!("{:>width$}  FAILED: {}", outcome.name, msg);
                    }
                }
            }

            if failed > 0 {
                return Err(format!("{} of {} cases failed verification", failed, outcomes.len()).into());
            }
        }

        Commands::Cpu => {
            CpuCapabilities::detect().print_report();
        }

        Commands::Config { write } => {
            println!("{}", toml::to_string_pretty(&config)?);
            if write {
                let path = BenchConfig::default_path().ok_or("No config directory on this platform")?;
                config.save(&path)?;
                println!("Saved to {}", path.display());
            }
        }
    }

    Ok(())
}
