use anyhow::{anyhow, Context, Result};
use mspp_algo::{SolverConfig, SolverKind};
use mspp_io::{read_network_instances, NetworkInstance};
use mspp_cli::NetworkArgs;

pub fn load_instances(input: &NetworkArgs) -> Result<Vec<NetworkInstance>> {
    let instances = read_network_instances(&input.network, input.layout)
        .with_context(|| format!("loading network '{}'", input.network.display()))?;
    if instances.is_empty() {
        return Err(anyhow!(
            "network file '{}' holds no instances",
            input.network.display()
        ));
    }
    Ok(instances)
}

/// Pick an instance by label, falling back to its zero-based position.
pub fn select_instance(
    instances: Vec<NetworkInstance>,
    selector: Option<&str>,
) -> Result<NetworkInstance> {
    let Some(selector) = selector else {
        return instances
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no network instances to choose from"));
    };
    let position = instances
        .iter()
        .position(|instance| instance.label == selector)
        .or_else(|| {
            selector
                .parse::<usize>()
                .ok()
                .filter(|&idx| idx < instances.len())
        });
    let labels: Vec<String> = instances.iter().map(|i| i.label.clone()).collect();
    position
        .and_then(|idx| instances.into_iter().nth(idx))
        .ok_or_else(|| {
            anyhow!(
                "instance '{}' not found; available: {}",
                selector,
                labels.join(", ")
            )
        })
}

/// Command-line solver options override the configuration file.
pub fn solver_config(
    base: &SolverConfig,
    backend: Option<SolverKind>,
    time_limit: Option<f64>,
) -> SolverConfig {
    let mut config = base.clone();
    if let Some(backend) = backend {
        config.backend = backend;
    }
    if time_limit.is_some() {
        config.time_limit_seconds = time_limit;
    }
    config
}

pub fn format_duration(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{:.1}ms", ms)
    } else if ms < 60_000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else {
        let mins = (ms / 60_000.0).floor();
        let secs = (ms % 60_000.0) / 1000.0;
        format!("{:.0}m {:.1}s", mins, secs)
    }
}
