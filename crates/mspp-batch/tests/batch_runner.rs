//! Batch runs over several instances and variants

use mspp_algo::{SolverConfig, Variant};
use mspp_batch::{jobs_from_instances, load_batch_manifest, run_batch, BatchRunnerConfig};
use mspp_core::{layered_grid, Agent, GridShape};
use mspp_io::NetworkInstance;

fn instances() -> Vec<NetworkInstance> {
    let shape = GridShape::new(2, 2);
    vec![
        NetworkInstance {
            label: "unit".into(),
            network: layered_grid(shape, |_, _| 1.0).unwrap(),
        },
        NetworkInstance {
            label: "double".into(),
            network: layered_grid(shape, |_, _| 2.0).unwrap(),
        },
    ]
}

#[test]
fn every_job_writes_a_solution_and_a_manifest_entry() {
    let dir = tempfile::tempdir().unwrap();
    let agents = vec![Agent::new(0, 3, 0), Agent::new(0, 3, 1)];
    let jobs = jobs_from_instances(&instances(), &agents, &[Variant::Mspp, Variant::Abp]);

    let summary = run_batch(&BatchRunnerConfig {
        jobs,
        output_root: dir.path().to_path_buf(),
        solver: SolverConfig::default(),
        threads: 2,
        source: Some("grid.csv".into()),
    })
    .unwrap();

    assert_eq!(summary.success, 4);
    assert_eq!(summary.failure, 0);
    for record in &summary.jobs {
        assert!(std::path::Path::new(&record.output).exists(), "{}", record.output);
    }

    let manifest = load_batch_manifest(&summary.manifest_path).unwrap();
    assert_eq!(manifest.source.as_deref(), Some("grid.csv"));
    assert_eq!(manifest.instances, vec!["unit", "double"]);
    assert_eq!(manifest.variants, vec![Variant::Mspp, Variant::Abp]);
    let abp_double = manifest
        .jobs
        .iter()
        .find(|job| job.job_id == "abp:double")
        .unwrap();
    // both agents must cross the single arc 0→3
    assert_eq!(abp_double.objectives, vec![4.0, 1.0]);
}

#[test]
fn repeated_labels_write_separate_solutions() {
    let dir = tempfile::tempdir().unwrap();
    let mut twins = instances();
    twins[1].label = twins[0].label.clone();
    let agents = vec![Agent::new(0, 3, 0)];
    let jobs = jobs_from_instances(&twins, &agents, &[Variant::Abp]);
    assert_eq!(jobs[0].job_id, jobs[1].job_id);

    let summary = run_batch(&BatchRunnerConfig {
        jobs,
        output_root: dir.path().to_path_buf(),
        solver: SolverConfig::default(),
        threads: 2,
        source: None,
    })
    .unwrap();

    assert_eq!(summary.success, 2);
    assert_ne!(summary.jobs[0].output, summary.jobs[1].output);
    // unit weights cost 1, doubled weights cost 2; both files must survive
    let distances: Vec<f64> = summary.jobs.iter().map(|job| job.objectives[0]).collect();
    assert_eq!(distances, vec![1.0, 2.0]);
    for record in &summary.jobs {
        let path = std::path::Path::new(&record.output);
        assert!(path.starts_with(dir.path()));
        assert!(path.exists());
    }
}

#[test]
fn labels_cannot_escape_the_output_root() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("runs");
    let mut escaping = instances();
    escaping.truncate(1);
    escaping[0].label = "../../outside".into();
    let jobs = jobs_from_instances(&escaping, &[Agent::new(0, 3, 0)], &[Variant::Mspp]);

    let summary = run_batch(&BatchRunnerConfig {
        jobs,
        output_root: out.clone(),
        solver: SolverConfig::default(),
        threads: 1,
        source: None,
    })
    .unwrap();

    let output = std::path::Path::new(&summary.jobs[0].output);
    assert!(output.starts_with(&out), "{}", output.display());
    assert!(output.exists());
}

#[test]
fn failing_jobs_are_recorded_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    // terminus 0 cannot be reached from 3 on a layered grid
    let agents = vec![Agent::new(3, 0, 0)];
    let jobs = jobs_from_instances(&instances()[..1], &agents, &[Variant::Nbp]);

    let summary = run_batch(&BatchRunnerConfig {
        jobs,
        output_root: dir.path().to_path_buf(),
        solver: SolverConfig::default(),
        threads: 0,
        source: None,
    })
    .unwrap();

    assert_eq!(summary.failure, 1);
    let record = &summary.jobs[0];
    assert_eq!(record.status, "error");
    assert!(record.error.as_deref().unwrap_or_default().contains("infeasible"));
}
