//! # mspp-io: Instance I/O
//!
//! Reads network weight tables and agent lists, and writes agents, solution
//! reports and route drawings.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mspp_io::importers::{read_agents, read_network_instances, Layout};
//!
//! fn main() -> mspp_core::MsppResult<()> {
//!     let instances = read_network_instances("networks.csv", Layout::Rows)?;
//!     let agents = read_agents("agents.json")?;
//!     for instance in &instances {
//!         instance.network.validate_agents(&agents)?;
//!         println!("{}: {}", instance.label, instance.network.stats());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Formats
//!
//! | Data | Format | Reader / writer |
//! |------|--------|-----------------|
//! | Networks | CSV, `rows` or `cols` layout, decimal comma allowed | [`importers::read_network_instances`] |
//! | Agents | JSON array or CSV `source,terminus[,id]` | [`importers::read_agents`], [`exporters::write_agents_json`] |
//! | Solutions | JSON with metadata envelope | [`exporters::write_solution_json`] |
//! | Routes | Graphviz DOT | [`exporters::write_dot`] |
//!
//! ## Error Handling
//!
//! Every reader returns [`mspp_core::MsppResult`]; malformed cells are
//! reported as `MsppError::Parse` with their line number.

pub mod exporters;
pub mod importers;

pub use exporters::{write_agents_json, write_dot, write_json, write_solution_json, ExportMetadata};
pub use importers::{
    read_agents, read_network_instances, validate_instances, Layout, NetworkInstance,
};
