//! Evaluate a transcript: EVALUATE, LOG into a fresh session, RETRIEVE, print.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use parley_core::rubric::{CefrLevel, SpeakingEvaluation};
use parley_core::{
    EvaluationRequest, Evaluator, EvaluatorConfig, ScoringSession, SessionContext,
};
use parley_models::auth::ApiKey;
use parley_models::providers::{GeminiProvider, GenerationProvider, OllamaProvider};
use tracing::debug;

use crate::config::{ConfigLoader, ParleyConfig, ProviderKind};

/// Evaluate arguments.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Transcript file, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Level the learner is working towards (A1..C2)
    #[arg(long)]
    pub target_level: Option<CefrLevel>,

    /// The communicative task the learner was given
    #[arg(long)]
    pub task: Option<String>,

    /// Print the evaluation as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the configured provider
    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Override the configured model
    #[arg(long)]
    pub model: Option<String>,

    /// Override the configured timeout (0 disables it)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

pub async fn run(args: EvaluateArgs) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    apply_overrides(&mut config, &args);

    let transcript = read_transcript(&args.input)?;
    let provider = build_provider(&config)?;

    let mut evaluator_config = EvaluatorConfig::new(config.model.name.clone());
    evaluator_config.temperature = config.model.temperature;
    evaluator_config.max_tokens = config.model.max_tokens;

    let mut session = ScoringSession::new(
        Evaluator::new(provider, evaluator_config),
        SessionContext::default(),
    );

    let mut request = EvaluationRequest::new(transcript);
    request.target_level = args.target_level;
    request.task = args.task;

    let evaluation = if config.model.timeout_secs > 0 {
        let limit = Duration::from_secs(config.model.timeout_secs);
        tokio::time::timeout(limit, session.evaluate_request(&request))
            .await
            .map_err(|_| anyhow!("Evaluation timed out after {}s", limit.as_secs()))??
    } else {
        session.evaluate_request(&request).await?
    };

    let confirmation = session.log(evaluation);
    debug!(session = %session.context().id(), %confirmation);

    let stored = session
        .retrieve()
        .ok_or_else(|| anyhow!("Logged evaluation missing from session"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(stored)?);
    } else {
        print_evaluation(stored);
    }
    Ok(())
}

fn apply_overrides(config: &mut ParleyConfig, args: &EvaluateArgs) {
    if let Some(provider) = args.provider
        && provider != config.model.provider
    {
        config.model.provider = provider;
        // A model name configured for another provider would not resolve.
        config.model.name = provider.default_model().to_string();
    }
    if let Some(model) = &args.model {
        config.model.name = model.clone();
    }
    if let Some(timeout) = args.timeout_secs {
        config.model.timeout_secs = timeout;
    }
}

fn read_transcript(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read transcript from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))
    }
}

fn build_provider(config: &ParleyConfig) -> Result<Arc<dyn GenerationProvider>> {
    match config.model.provider {
        ProviderKind::Ollama => Ok(Arc::new(OllamaProvider::with_base_url(
            &config.ollama.host,
        ))),
        ProviderKind::Gemini => {
            let key = ApiKey::from_env("gemini")
                .context("Gemini needs GEMINI_API_KEY or GOOGLE_API_KEY")?;
            Ok(Arc::new(GeminiProvider::with_base_url(
                key,
                &config.gemini.base_url,
            )))
        }
    }
}

fn print_evaluation(evaluation: &SpeakingEvaluation) {
    println!("{}", render_table(evaluation));
    println!();
    match evaluation.target_level {
        Some(target) => println!("Overall: {} (target {})", evaluation.overall_level, target),
        None => println!("Overall: {}", evaluation.overall_level),
    }
    println!("{}", evaluation.overall_summary);
    if let Some(recommendations) = &evaluation.overall_recommendations {
        println!();
        println!("Next steps: {recommendations}");
    }
}

fn render_table(evaluation: &SpeakingEvaluation) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Criterion").fg(Color::Cyan),
        Cell::new("Facet").fg(Color::Cyan),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Level").fg(Color::Cyan),
    ]);

    for judgment in evaluation.criteria() {
        for (i, facet) in judgment.facets().into_iter().enumerate() {
            let label = if i == 0 { judgment.criterion().label() } else { "" };
            table.add_row(vec![
                Cell::new(label),
                Cell::new(facet.name),
                Cell::new(format!("{}/5", facet.subscore.score)),
                Cell::new(facet.subscore.cefr_level),
            ]);
        }
        table.add_row(vec![
            Cell::new(""),
            Cell::new("overall").fg(Color::Yellow),
            Cell::new(""),
            Cell::new(judgment.overall_cefr_level()).fg(Color::Yellow),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::rubric::validate_json;
    use serial_test::serial;
    use tempfile::TempDir;

    const MARKET: &str = include_str!("../../../parley-core/tests/fixtures/market_evaluation.json");

    #[derive(clap::Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: EvaluateArgs,
    }

    fn args(extra: &[&str]) -> EvaluateArgs {
        use clap::Parser;

        let argv = std::iter::once("parley").chain(extra.iter().copied());
        Wrapper::parse_from(argv).args
    }

    #[test]
    fn test_args_parse_level_and_defaults() {
        let parsed = args(&["--target-level", "B2", "--json"]);
        assert_eq!(parsed.input, PathBuf::from("-"));
        assert_eq!(parsed.target_level, Some(CefrLevel::B2));
        assert!(parsed.json);
    }

    #[test]
    fn test_args_reject_unknown_level() {
        use clap::Parser;

        let result = Wrapper::try_parse_from(["parley", "--target-level", "b2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_provider_override_resets_model() {
        let mut config = ParleyConfig::default();
        apply_overrides(&mut config, &args(&["--provider", "ollama", "--timeout-secs", "5"]));

        assert_eq!(config.model.provider, ProviderKind::Ollama);
        assert_eq!(config.model.name, "llama3.1");
        assert_eq!(config.model.timeout_secs, 5);
    }

    #[test]
    fn test_explicit_model_wins() {
        let mut config = ParleyConfig::default();
        apply_overrides(&mut config, &args(&["--provider", "ollama", "--model", "qwen2.5"]));
        assert_eq!(config.model.name, "qwen2.5");
    }

    #[test]
    fn test_read_transcript_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sample.txt");
        std::fs::write(&path, "I go to the market.").unwrap();

        assert_eq!(read_transcript(&path).unwrap(), "I go to the market.");
        assert!(read_transcript(&temp_dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_build_ollama_provider() {
        let mut config = ParleyConfig::default();
        config.model.provider = ProviderKind::Ollama;
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    #[serial]
    fn test_gemini_without_key_fails() {
        unsafe {
            std::env::remove_var("GEMINI_API_KEY");
            std::env::remove_var("GOOGLE_API_KEY");
        }
        let result = build_provider(&ParleyConfig::default());
        let err = result.err().expect("expected missing key error");
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_table_lists_every_facet() {
        let evaluation = validate_json(MARKET).unwrap();
        let rendered = render_table(&evaluation).to_string();

        for facet in ["vocab_range", "accuracy", "managing_breakdowns", "prosody"] {
            assert!(rendered.contains(facet), "missing {facet}");
        }
        assert!(rendered.contains("Grammar"));
        assert!(rendered.contains("2/5"));
    }
}
