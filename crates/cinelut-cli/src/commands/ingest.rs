//! Service response validation command

use crate::IngestArgs;
use anyhow::{Context, Result};
use cinelut_session::{ingest, Language};

pub fn run(args: IngestArgs, lang: Language) -> Result<()> {
    let body = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read: {}", args.input.display()))?;

    // Unusable responses become the neutral fallback, as in a live session.
    let (params, is_fallback) = ingest::resolve_grade(Ok(body), lang);
    let json = serde_json::to_string_pretty(&params)?;

    match &args.output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write: {}", path.display()))?,
        None => println!("{json}"),
    }
    if is_fallback {
        eprintln!("{}", params.description);
    }
    Ok(())
}
