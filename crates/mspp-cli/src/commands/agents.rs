use anyhow::{Context, Result};
use mspp_algo::generate_agents;
use mspp_cli::cli::AgentCommands;
use mspp_core::GridShape;
use mspp_io::write_agents_json;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn handle(command: &AgentCommands) -> Result<()> {
    let AgentCommands::Generate {
        rows,
        cols,
        count,
        symmetry,
        seed,
        out,
    } = command;
    let shape = GridShape::new(*rows, *cols);
    let agents = match seed {
        Some(seed) => generate_agents(shape, *count, *symmetry, &mut StdRng::seed_from_u64(*seed)),
        None => generate_agents(shape, *count, *symmetry, &mut rand::thread_rng()),
    }?;
    write_agents_json(out, &agents)
        .with_context(|| format!("writing agents '{}'", out.display()))?;
    println!(
        "Generated {} {} agents for a {}x{} grid -> {}",
        agents.len(),
        symmetry,
        rows,
        cols,
        out.display()
    );
    Ok(())
}
