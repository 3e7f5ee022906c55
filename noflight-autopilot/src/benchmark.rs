use crate::runner::{load_game_state, solve_snapshot};
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub levels: Vec<PathBuf>,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelRecord {
    pub level: String,
    pub aircraft: usize,
    pub planned: usize,
    pub ticks: usize,
    pub command_ticks: usize,
    pub landed: usize,
    pub worst_closest_approach: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub jobs: Option<usize>,
    pub level_count: usize,
    pub aircraft_total: usize,
    pub landed_total: usize,
    pub levels: Vec<LevelRecord>,
}

/// Expands directories into the `.json` files they hold, sorted by path.
pub fn resolve_levels(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut levels = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in fs::read_dir(input)
                .with_context(|| format!("failed listing {}", input.display()))?
            {
                let path = entry
                    .with_context(|| format!("failed listing {}", input.display()))?
                    .path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    found.push(path);
                }
            }
            found.sort();
            levels.extend(found);
        } else {
            levels.push(input.clone());
        }
    }
    if levels.is_empty() {
        return Err(anyhow!("no level files found"));
    }
    Ok(levels)
}

fn run_level(path: &Path) -> Result<LevelRecord> {
    let state = load_game_state(path)?;
    let artifact = solve_snapshot(&state);
    Ok(LevelRecord {
        level: path.display().to_string(),
        aircraft: artifact.aircraft,
        planned: artifact.reports.len(),
        ticks: artifact.ticks,
        command_ticks: artifact.batches.iter().filter(|b| !b.is_empty()).count(),
        landed: artifact.landed(),
        worst_closest_approach: artifact.worst_closest_approach().unwrap_or_default(),
    })
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.levels.is_empty() {
        return Err(anyhow!("benchmark requires at least one level"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
        }
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let run_one = |path: &PathBuf| -> Result<LevelRecord> {
        run_level(path).with_context(|| format!("benchmark run failed for {}", path.display()))
    };

    let results: Vec<Result<LevelRecord>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| config.levels.par_iter().map(run_one).collect())
    } else {
        config.levels.par_iter().map(run_one).collect()
    };

    let mut levels = Vec::with_capacity(results.len());
    for result in results {
        levels.push(result?);
    }

    write_levels_csv(&config.out_dir.join("runs.csv"), &levels)?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        jobs: config.jobs,
        level_count: levels.len(),
        aircraft_total: levels.iter().map(|l| l.aircraft).sum(),
        landed_total: levels.iter().map(|l| l.landed).sum(),
        levels,
    };

    let report_path = config.out_dir.join("summary.json");
    fs::write(
        &report_path,
        serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
    )
    .with_context(|| format!("failed writing {}", report_path.display()))?;

    Ok(report)
}

fn write_levels_csv(path: &Path, rows: &[LevelRecord]) -> Result<()> {
    let mut csv = String::from(
        "level,aircraft,planned,ticks,command_ticks,landed,worst_closest_approach\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{:.3}\n",
            row.level,
            row.aircraft,
            row.planned,
            row.ticks,
            row.command_ticks,
            row.landed,
            row.worst_closest_approach
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
