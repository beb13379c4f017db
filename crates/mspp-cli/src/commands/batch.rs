use anyhow::{Context, Result};
use mspp_batch::{jobs_from_instances, run_batch, BatchRunnerConfig, BatchSummary};
use mspp_cli::{BatchArgs, MsppConfig};
use mspp_io::read_agents;
use std::time::Instant;
use tracing::info;

use super::common::{format_duration, load_instances, solver_config};

fn print_batch_summary(summary: &BatchSummary, elapsed_ms: f64) {
    println!(
        "Batch finished in {}: {} jobs, {} succeeded, {} failed",
        format_duration(elapsed_ms),
        summary.jobs.len(),
        summary.success,
        summary.failure
    );
    for job in &summary.jobs {
        if job.status == "ok" {
            let objectives: Vec<String> = job.objectives.iter().map(|v| v.to_string()).collect();
            println!("  ✓ {} [{}]", job.job_id, objectives.join(", "));
        } else {
            println!(
                "  ✗ {} - {}",
                job.job_id,
                job.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    println!("Manifest: {}", summary.manifest_path.display());
}

pub fn handle(args: &BatchArgs, config: &MsppConfig) -> Result<()> {
    let instances = load_instances(&args.input)?;
    let agents = read_agents(&args.agents)
        .with_context(|| format!("loading agents '{}'", args.agents.display()))?;
    let variants = if args.variants.is_empty() {
        vec![config.variant]
    } else {
        args.variants.clone()
    };
    let jobs = jobs_from_instances(&instances, &agents, &variants);
    info!(
        instances = instances.len(),
        variants = variants.len(),
        jobs = jobs.len(),
        "prepared batch"
    );

    let start = Instant::now();
    let summary = run_batch(&BatchRunnerConfig {
        jobs,
        output_root: args.out.clone(),
        solver: solver_config(&config.solver, args.solver, args.time_limit),
        threads: args.threads.unwrap_or(config.batch.threads),
        source: Some(args.input.network.display().to_string()),
    })?;
    print_batch_summary(&summary, start.elapsed().as_secs_f64() * 1000.0);
    Ok(())
}
