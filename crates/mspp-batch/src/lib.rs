pub mod job;
pub mod manifest;
pub mod runner;

pub use job::{job_dir_name, jobs_from_instances, BatchJob, BatchJobRecord};
pub use manifest::{load_batch_manifest, write_batch_manifest, BatchManifest};
pub use runner::{run_batch, BatchRunnerConfig, BatchSummary};
