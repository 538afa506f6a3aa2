use std::fs::File;
use std::io::{self, BufRead, BufReader};

use clap::AppSettings;
use failure::Error;
use tracing_subscriber::EnvFilter;

use hybridtree::SentenceLine;

pub static DEFAULT_CLAP_SETTINGS: &[AppSettings] = &[
    AppSettings::DontCollapseArgsInUsage,
    AppSettings::UnifiedHelpMessage,
];

/// Log to stderr, the level is read from `RUST_LOG` and defaults to `warn`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Read the non-empty lines of a sentence file.
pub fn read_sentences(path: &str) -> Result<Vec<SentenceLine>, Error> {
    let reader = BufReader::new(File::open(path)?);
    let mut sentences = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        sentences.push(line.parse()?);
    }
    Ok(sentences)
}
