use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use noflight_autopilot::benchmark::{resolve_levels, run_benchmark, BenchmarkConfig};
use noflight_autopilot::config::AppConfig;
use noflight_autopilot::runner::{parse_game_state, solve_snapshot};
use noflight_autopilot::session::Session;
use noflight_autopilot::util::{read_input, timestamp_suffix, write_file};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser, Debug)]
#[command(name = "noflight-autopilot")]
#[command(about = "Route planner and command scheduler for the no-flight air traffic game")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Plan one game state (file or stdin) and print the solve artifact
    Plan {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print only the per-tick command batches
        #[arg(long, default_value_t = false)]
        commands_only: bool,
    },
    /// Answer game-instance messages from stdin with run-command replies on stdout
    Session {
        #[arg(long)]
        game_id: String,
        /// Overrides COMMAND_DELAY_MS
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Solve many level files in parallel and write summary.json and runs.csv
    Benchmark {
        /// Level files or directories of them
        #[arg(long, num_args = 1.., required = true)]
        levels: Vec<PathBuf>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Print the backend endpoints derived from the environment
    Endpoints {
        #[arg(long)]
        game_id: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let Cli { command } = Cli::parse();
    let config = AppConfig::from_env();

    match command {
        Commands::Plan {
            input,
            output,
            commands_only,
        } => {
            let text = read_input(input.as_deref())?;
            let state = parse_game_state(&text)?;
            let artifact = solve_snapshot(&state);
            let encoded = if commands_only {
                serde_json::to_vec_pretty(&artifact.batches)
            } else {
                serde_json::to_vec_pretty(&artifact)
            }
            .context("failed to serialize plan")?;

            if let Some(path) = output {
                write_file(&path, &encoded)?;
                println!("wrote={}", path.display());
                println!("aircraft={}", artifact.aircraft);
                println!("planned={}", artifact.reports.len());
                println!("ticks={}", artifact.ticks);
                println!("landed={}", artifact.landed());
            } else {
                println!("{}", String::from_utf8_lossy(&encoded));
            }
        }
        Commands::Session { game_id, delay_ms } => {
            let game_id = game_id.trim().to_string();
            if game_id.is_empty() {
                return Err(anyhow!("--game-id must not be empty"));
            }
            let delay = delay_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.command_delay());
            tracing::info!(game_url = %config.game_url(&game_id), "starting session");

            let mut session = Session::new(game_id);
            let summary = session.run(io::stdin().lock(), io::stdout().lock(), delay)?;
            tracing::info!(
                game = %summary.game_id,
                ticks = summary.ticks,
                status = summary.final_status.as_deref().unwrap_or("input closed"),
                "session ended"
            );
        }
        Commands::Benchmark {
            levels,
            out_dir,
            jobs,
        } => {
            let levels = resolve_levels(&levels)?;
            let out_dir = out_dir.unwrap_or_else(|| {
                PathBuf::from(format!("benchmarks/levels-{}", timestamp_suffix()))
            });

            let report = run_benchmark(BenchmarkConfig {
                levels,
                out_dir: out_dir.clone(),
                jobs,
            })?;

            println!("levels={}", report.level_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("landed={}/{}", report.landed_total, report.aircraft_total);
            println!("out_dir={}", out_dir.display());
            for level in &report.levels {
                println!(
                    "  {:40} aircraft={} landed={} ticks={} worst_approach={:.2}",
                    level.level,
                    level.aircraft,
                    level.landed,
                    level.ticks,
                    level.worst_closest_approach
                );
            }
        }
        Commands::Endpoints { game_id } => {
            println!("frontend={}", config.frontend_base);
            println!("backend={}", config.backend_base);
            match config.create_game_url() {
                Some(url) => println!("create_game={url}"),
                None => println!("create_game=<LEVEL_ID unset>"),
            }
            match config.redacted_socket_url() {
                Some(url) => println!("socket={url}"),
                None => println!("socket=<TOKEN unset>"),
            }
            if let Some(game_id) = game_id {
                println!("game={}", config.game_url(&game_id));
            }
            println!("command_delay_ms={}", config.command_delay_ms);
        }
    }

    Ok(())
}
