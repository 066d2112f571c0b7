use anyhow::Result;
use parley_core::rubric::evaluation_schema;

pub fn run() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(evaluation_schema())?);
    Ok(())
}
