//! Network inspection: structure, diagnostics and formulation sizes.

use anyhow::{Context, Result};
use mspp_algo::{build_model, Variant};
use mspp_cli::InspectArgs;
use mspp_core::{graph_stats, Agent, DiagnosticIssue, Diagnostics};
use mspp_io::{read_agents, validate_instances, NetworkInstance};
use serde::Serialize;
use std::io::{self, Write};
use tabwriter::TabWriter;

use super::common::load_instances;

#[derive(Debug, Serialize)]
struct InstanceReport {
    label: String,
    nodes: usize,
    arcs: usize,
    total_weight: f64,
    min_out_degree: usize,
    avg_out_degree: f64,
    max_out_degree: usize,
    density: f64,
    strongly_connected_components: usize,
    models: Vec<ModelSize>,
}

#[derive(Debug, Serialize)]
struct ModelSize {
    variant: Variant,
    variables: usize,
    constraints: usize,
    objectives: usize,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    instances: Vec<InstanceReport>,
    diagnostics: Vec<DiagnosticIssue>,
}

pub fn handle(args: &InspectArgs) -> Result<()> {
    let instances = load_instances(&args.input)?;
    let agents = match &args.agents {
        Some(path) => Some(
            read_agents(path).with_context(|| format!("loading agents '{}'", path.display()))?,
        ),
        None => None,
    };
    let variants: Vec<Variant> = match args.variant {
        Some(variant) => vec![variant],
        None => Variant::ALL.to_vec(),
    };

    let mut diag = validate_instances(&instances);
    if let Some(agents) = &agents {
        for instance in &instances {
            let mut local = Diagnostics::new();
            instance.network.validate_agents_into(agents, &mut local);
            for mut issue in local.issues {
                issue.message = format!("[{}] {}", instance.label, issue.message);
                diag.add(issue);
            }
        }
    }

    let mut reports = Vec::with_capacity(instances.len());
    for instance in &instances {
        reports.push(inspect_instance(instance, agents.as_deref(), &variants)?);
    }

    if args.json {
        let report = InspectReport {
            instances: reports,
            diagnostics: diag.issues,
        };
        serde_json::to_writer_pretty(io::stdout(), &report)
            .context("serializing inspection report to JSON")?;
        println!();
        return Ok(());
    }
    print_reports(&reports)?;
    println!("Diagnostics: {}", diag.summary());
    for issue in &diag.issues {
        let entity = issue.entity.as_deref().unwrap_or("-");
        println!(
            "  [{:?}] {}: {} ({})",
            issue.severity, issue.category, issue.message, entity
        );
    }
    Ok(())
}

fn inspect_instance(
    instance: &NetworkInstance,
    agents: Option<&[Agent]>,
    variants: &[Variant],
) -> Result<InstanceReport> {
    let stats = graph_stats(&instance.network);
    let mut models = Vec::new();
    if let Some(agents) = agents {
        for &variant in variants {
            let formulation = build_model(variant, &instance.network, agents).with_context(|| {
                format!("building {} for instance '{}'", variant, instance.label)
            })?;
            let model = formulation.model.stats();
            models.push(ModelSize {
                variant,
                variables: model.variables,
                constraints: model.constraints,
                objectives: model.objectives,
            });
        }
    }
    Ok(InstanceReport {
        label: instance.label.clone(),
        nodes: stats.node_count,
        arcs: stats.arc_count,
        total_weight: instance.network.stats().total_weight,
        min_out_degree: stats.min_out_degree,
        avg_out_degree: stats.avg_out_degree,
        max_out_degree: stats.max_out_degree,
        density: stats.density,
        strongly_connected_components: stats.strongly_connected_components,
        models,
    })
}

fn print_reports(reports: &[InstanceReport]) -> Result<()> {
    for report in reports {
        println!("Instance '{}':", report.label);
        println!("  Nodes         : {}", report.nodes);
        println!("  Arcs          : {}", report.arcs);
        println!("  Total weight  : {:.3}", report.total_weight);
        println!(
            "  Out-degree    : min {} / avg {:.2} / max {}",
            report.min_out_degree, report.avg_out_degree, report.max_out_degree
        );
        println!("  Density       : {:.4}", report.density);
        println!("  Strong comps  : {}", report.strongly_connected_components);
        if report.models.is_empty() {
            continue;
        }
        let mut writer = TabWriter::new(io::stdout()).padding(2);
        writeln!(writer, "  VARIANT\tVARIABLES\tCONSTRAINTS\tOBJECTIVES")?;
        for model in &report.models {
            writeln!(
                writer,
                "  {}\t{}\t{}\t{}",
                model.variant, model.variables, model.constraints, model.objectives
            )?;
        }
        writer.flush()?;
    }
    Ok(())
}
