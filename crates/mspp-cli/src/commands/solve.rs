use anyhow::{bail, Context, Result};
use mspp_algo::{route_agents, GoodLpSolver, ModelSolver};
use mspp_cli::{MsppConfig, SolveArgs};
use mspp_core::Diagnostics;
use mspp_io::{read_agents, write_dot, write_solution_json, ExportMetadata};
use tracing::{info, warn};

use super::common::{format_duration, load_instances, select_instance, solver_config};

pub fn handle(args: &SolveArgs, config: &MsppConfig) -> Result<()> {
    let variant = args.variant.unwrap_or(config.variant);
    let instance = select_instance(load_instances(&args.input)?, args.instance.as_deref())?;
    let agents = read_agents(&args.agents)
        .with_context(|| format!("loading agents '{}'", args.agents.display()))?;

    let mut diag = Diagnostics::new();
    instance.network.validate_into(&mut diag);
    instance.network.validate_agents_into(&agents, &mut diag);
    for issue in &diag.issues {
        warn!(
            category = %issue.category,
            entity = issue.entity.as_deref().unwrap_or("-"),
            "{}",
            issue.message
        );
    }
    if diag.has_errors() {
        bail!(
            "instance '{}' cannot be routed: {}",
            instance.label,
            diag.summary()
        );
    }

    let solver = GoodLpSolver::new(solver_config(&config.solver, args.solver, args.time_limit));
    info!(
        variant = %variant,
        instance = %instance.label,
        agents = agents.len(),
        backend = solver.name(),
        "solving"
    );
    let outcome = route_agents(variant, &instance.network, &agents, &solver)
        .with_context(|| format!("routing agents on instance '{}'", instance.label))?;
    let report = outcome.report(&instance.network);

    let metadata = ExportMetadata::now()
        .with_source(args.input.network.display().to_string(), instance.label.clone());
    write_solution_json(&args.out, &report, &metadata)
        .with_context(|| format!("writing solution '{}'", args.out.display()))?;
    if let Some(dot) = &args.dot {
        write_dot(dot, &instance.network, &outcome.routes.arc_lists())
            .with_context(|| format!("writing DOT file '{}'", dot.display()))?;
    }

    println!(
        "Solved {} on '{}' ({} agents) in {}",
        variant,
        instance.label,
        agents.len(),
        format_duration(report.solve_time_ms)
    );
    println!("  status   : {}", report.status);
    println!("  distance : {}", outcome.distance());
    if let Some(penalty) = outcome.penalty() {
        println!("  penalty  : {}", penalty);
    }
    for route in outcome.routes.routes.values() {
        let nodes: Vec<String> = route.nodes.iter().map(|n| n.to_string()).collect();
        println!(
            "  agent {:>3}: {} (length {})",
            route.agent.value(),
            nodes.join(" -> "),
            route.length
        );
    }
    println!("Solution written to {}", args.out.display());
    Ok(())
}
