use anyhow::Result;
use mspp_algo::Variant;
use std::io::{self, Write};
use tabwriter::TabWriter;

pub fn handle() -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "VARIANT\tPENALTY\tDESCRIPTION")?;
    for variant in Variant::ALL {
        let penalty = if variant.has_penalty() { "yes" } else { "no" };
        writeln!(writer, "{}\t{}\t{}", variant, penalty, variant.description())?;
    }
    writer.flush()?;
    Ok(())
}
