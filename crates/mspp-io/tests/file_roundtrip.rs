//! Import a weight table from disk, solve it, export the solution

use mspp_algo::{route_agents, GoodLpSolver, Variant};
use mspp_io::importers::{read_agents, read_network_instances, Layout};
use mspp_io::{validate_instances, write_dot, write_solution_json, ExportMetadata};
use std::fs;

const GRID_2X2_ROWS: &str = "\
i,1,1,2,2
j,3,4,3,4
unit,1,1,1,1
skewed,\"1,0\",\"4,0\",\"4,0\",\"1,0\"
";

#[test]
fn imported_instances_solve_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let network_path = dir.path().join("grid.csv");
    let agents_path = dir.path().join("agents.csv");
    fs::write(&network_path, GRID_2X2_ROWS).unwrap();
    fs::write(&agents_path, "source,terminus\n0,3\n1,2\n").unwrap();

    let instances = read_network_instances(&network_path, Layout::Rows).unwrap();
    assert_eq!(instances.len(), 2);
    assert!(!validate_instances(&instances).has_errors());
    let agents = read_agents(&agents_path).unwrap();

    let unit = route_agents(Variant::Abp, &instances[0].network, &agents, &GoodLpSolver::default())
        .unwrap();
    assert_eq!(unit.objectives, vec![2.0, 0.0]);

    // on the skewed instance both cheap arcs (0→2, 1→3) lead to the wrong terminus
    let skewed =
        route_agents(Variant::Abp, &instances[1].network, &agents, &GoodLpSolver::default())
            .unwrap();
    assert_eq!(skewed.objectives, vec![8.0, 0.0]);

    let report = skewed.report(&instances[1].network);
    let out = dir.path().join("out/solution.json");
    let metadata = ExportMetadata::now().with_source("grid.csv", &instances[1].label);
    write_solution_json(&out, &report, &metadata).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(raw["solution"]["variant"], "ABP");
    assert_eq!(raw["metadata"]["instance"], "skewed");

    let dot = dir.path().join("out/routes.dot");
    write_dot(&dot, &instances[1].network, &skewed.routes.arc_lists()).unwrap();
    assert!(fs::read_to_string(&dot).unwrap().contains("style=bold"));
}

#[test]
fn missing_files_surface_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_network_instances(dir.path().join("absent.csv"), Layout::Cols).unwrap_err();
    assert!(err.to_string().contains("absent.csv"));
}
