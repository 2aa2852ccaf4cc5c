use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fathom_core::blocks::{detect_transducer_config, split_by_channel};
use fathom_core::io::read_records;

#[derive(Args)]
pub struct InfoArgs {
    /// Metadata table (CSV)
    pub metadata: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let set = read_records(&args.metadata)
        .with_context(|| format!("Failed to read {}", args.metadata.display()))?;
    let by_channel = split_by_channel(&set.records);
    let transducer = detect_transducer_config(&set.records);

    println!("File:        {}", args.metadata.display());
    println!("Records:     {}", set.records.len());
    println!("Skipped:     {}", set.skipped);
    println!("Scan type:   {}", transducer.scan_type);

    for (channel, records) in &by_channel {
        let span = match (records.first(), records.last()) {
            (Some(first), Some(last)) => format!("seq {}..{}", first.seq, last.seq),
            _ => String::new(),
        };
        println!("Channel {:<4}{} records  {}", channel, records.len(), span);
    }

    if !transducer.suggested_pairs.is_empty() {
        let pairs: Vec<String> = transducer
            .suggested_pairs
            .iter()
            .map(|(l, r)| format!("{l}/{r}"))
            .collect();
        println!("Pairs:       {}", pairs.join(", "));
    }
    if let Some(ref serial) = transducer.transducer_serial {
        println!("Serial:      {}", serial);
    }

    Ok(())
}
