//! Offline rubric check of an evaluation file.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use parley_core::rubric::validate_json;

/// Validate arguments.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Evaluation JSON file
    pub file: PathBuf,

    /// Transcript the evaluation was made from; checks that evidence is quoted verbatim
    #[arg(long)]
    pub transcript: Option<PathBuf>,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let evaluation = match validate_json(&text) {
        Ok(evaluation) => evaluation,
        Err(err) => {
            for issue in err.issues() {
                eprintln!("  {issue}");
            }
            bail!(
                "{} does not match the rubric ({} issue(s))",
                args.file.display(),
                err.issues().len()
            );
        }
    };

    println!(
        "{}: valid, overall level {}",
        args.file.display(),
        evaluation.overall_level
    );
    for advisory in evaluation.advisories() {
        println!("  note: {advisory}");
    }

    if let Some(path) = args.transcript {
        let transcript = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        for unquoted in evaluation.unquoted_excerpts(&transcript) {
            println!(
                "  note: {}.{} excerpt not in transcript: {:?}",
                unquoted.criterion.key(),
                unquoted.facet,
                unquoted.excerpt
            );
        }
    }

    Ok(())
}
