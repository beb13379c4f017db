use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use mspp_algo::{SolverConfig, Variant};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::job::BatchJobRecord;

/// `batch_manifest.json`: what was solved, with which backend, and how each job ended.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchManifest {
    pub created_at: DateTime<Utc>,
    /// Network file the instances were read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub solver: SolverConfig,
    /// Instance labels in job order, without repeats
    pub instances: Vec<String>,
    pub variants: Vec<Variant>,
    pub success: usize,
    pub failure: usize,
    pub jobs: Vec<BatchJobRecord>,
}

impl BatchManifest {
    pub fn new(source: Option<String>, solver: SolverConfig, jobs: Vec<BatchJobRecord>) -> Self {
        let mut instances: Vec<String> = Vec::new();
        let mut variants: Vec<Variant> = Vec::new();
        for job in &jobs {
            if !instances.contains(&job.instance) {
                instances.push(job.instance.clone());
            }
            if !variants.contains(&job.variant) {
                variants.push(job.variant);
            }
        }
        let success = jobs.iter().filter(|job| job.is_ok()).count();
        Self {
            created_at: Utc::now(),
            source,
            solver,
            instances,
            variants,
            success,
            failure: jobs.len() - success,
            jobs,
        }
    }

    pub fn num_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Finished jobs of one variant, in instance order.
    pub fn solved_with(&self, variant: Variant) -> impl Iterator<Item = &BatchJobRecord> {
        self.jobs
            .iter()
            .filter(move |job| job.variant == variant && job.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchJobRecord> {
        self.jobs.iter().filter(|job| !job.is_ok())
    }
}

pub fn write_batch_manifest(path: &Path, manifest: &BatchManifest) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating manifest directory '{}'", parent.display()))?;
    }
    let json =
        serde_json::to_string_pretty(manifest).context("serializing batch manifest to JSON")?;
    fs::write(path, json)
        .with_context(|| format!("writing batch manifest '{}'", path.display()))?;
    Ok(())
}

pub fn load_batch_manifest(path: &Path) -> Result<BatchManifest> {
    let file = fs::File::open(path)
        .with_context(|| format!("opening batch manifest '{}'", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("parsing batch manifest '{}'", path.display()))
}
