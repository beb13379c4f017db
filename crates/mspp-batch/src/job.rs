use mspp_algo::Variant;
use mspp_core::{Agent, Network};
use mspp_io::NetworkInstance;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One (instance, variant) solve. Networks and agents are shared between jobs.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub job_id: String,
    pub instance_label: String,
    pub variant: Variant,
    pub network: Arc<Network>,
    pub agents: Arc<Vec<Agent>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJobRecord {
    pub job_id: String,
    pub instance: String,
    pub variant: Variant,
    pub status: String,
    pub error: Option<String>,
    /// Objective values in registration order (distance, then penalty)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objectives: Vec<f64>,
    pub solve_time_ms: Option<f64>,
    pub output: String,
}

impl BatchJobRecord {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Output directory name for the job at `position`.
///
/// The position keeps names unique even when ids repeat; anything outside
/// `[A-Za-z0-9_-]` becomes `_` so labels cannot leave the output root.
pub fn job_dir_name(position: usize, job_id: &str) -> String {
    let safe: String = job_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{:04}_{}", position, safe)
}

/// Cross every instance with every variant, instance-major.
pub fn jobs_from_instances(
    instances: &[NetworkInstance],
    agents: &[Agent],
    variants: &[Variant],
) -> Vec<BatchJob> {
    let agents = Arc::new(agents.to_vec());
    instances
        .iter()
        .flat_map(|instance| {
            let network = Arc::new(instance.network.clone());
            let agents = Arc::clone(&agents);
            variants.iter().map(move |variant| BatchJob {
                job_id: format!("{}:{}", variant.as_str().to_ascii_lowercase(), instance.label),
                instance_label: instance.label.clone(),
                variant: *variant,
                network: Arc::clone(&network),
                agents: Arc::clone(&agents),
            })
        })
        .collect()
}
