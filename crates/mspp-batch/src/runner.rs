use crate::job::{job_dir_name, BatchJob, BatchJobRecord};
use crate::manifest::{write_batch_manifest, BatchManifest};
use anyhow::{Context, Result};
use mspp_algo::{route_agents, GoodLpSolver, ModelSolver, SolverConfig};
use mspp_io::{write_solution_json, ExportMetadata};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Runner settings: the jobs, where results go, and how to solve them.
pub struct BatchRunnerConfig {
    pub jobs: Vec<BatchJob>,
    pub output_root: PathBuf,
    pub solver: SolverConfig,
    /// Worker threads; 0 uses every CPU
    pub threads: usize,
    /// Network file recorded in each solution's metadata
    pub source: Option<String>,
}

/// Summary returned after the run so clients can log success/failure counts and manifest location.
pub struct BatchSummary {
    pub success: usize,
    pub failure: usize,
    pub manifest_path: PathBuf,
    pub jobs: Vec<BatchJobRecord>,
}

pub fn run_batch(config: &BatchRunnerConfig) -> Result<BatchSummary> {
    fs::create_dir_all(&config.output_root).with_context(|| {
        format!(
            "creating batch output root '{}'",
            config.output_root.display()
        )
    })?;

    let thread_count = if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .context("building Rayon thread pool for batch runs")?;

    let solver = GoodLpSolver::new(config.solver.clone());
    info!(
        jobs = config.jobs.len(),
        threads = thread_count,
        backend = solver.name(),
        "starting batch"
    );

    // Each job owns its formulation; only the network and agents are shared read-only
    let job_records: Vec<BatchJobRecord> = pool.install(|| {
        config
            .jobs
            .par_iter()
            .enumerate()
            .map(|(position, job)| run_job(position, job, config, &solver))
            .collect()
    });

    let manifest = BatchManifest::new(config.source.clone(), config.solver.clone(), job_records);
    let manifest_path = config.output_root.join("batch_manifest.json");
    write_batch_manifest(&manifest_path, &manifest)?;
    info!(
        success = manifest.success,
        failure = manifest.failure,
        manifest = %manifest_path.display(),
        "batch finished"
    );
    Ok(BatchSummary {
        success: manifest.success,
        failure: manifest.failure,
        manifest_path,
        jobs: manifest.jobs,
    })
}

/// Build, solve and export one job.
///
/// Failures (invalid agents, infeasible models, I/O) are recorded in the
/// returned record instead of aborting the batch.
fn run_job(
    position: usize,
    job: &BatchJob,
    config: &BatchRunnerConfig,
    solver: &dyn ModelSolver,
) -> BatchJobRecord {
    let output_file = config
        .output_root
        .join(job_dir_name(position, &job.job_id))
        .join("solution.json");

    let runner = || -> Result<(Vec<f64>, f64)> {
        let outcome = route_agents(job.variant, &job.network, &job.agents, solver)?;
        let report = outcome.report(&job.network);
        let mut metadata = ExportMetadata::now();
        metadata.instance = Some(job.instance_label.clone());
        metadata.source = config.source.clone();
        write_solution_json(&output_file, &report, &metadata)
            .with_context(|| format!("writing solution for job {}", job.job_id))?;
        Ok((outcome.objectives, report.solve_time_ms))
    };

    let (status, error, objectives, solve_time_ms) = match runner() {
        Ok((objectives, ms)) => ("ok".to_string(), None, objectives, Some(ms)),
        Err(err) => {
            warn!(job = %job.job_id, error = %err, "batch job failed");
            ("error".to_string(), Some(err.to_string()), Vec::new(), None)
        }
    };
    BatchJobRecord {
        job_id: job.job_id.clone(),
        instance: job.instance_label.clone(),
        variant: job.variant,
        status,
        error,
        objectives,
        solve_time_ms,
        output: output_file.display().to_string(),
    }
}
