use anyhow::{Context, Result, anyhow};
use pantry_pricing::config::{AppConfig, DEFAULT_CONFIG_PATH};
use pantry_pricing::processor::{CandidateExtractor, Scorer, StrategyResult, TextNormalizer};
use std::env;
use tracing::{info, warn};

/// Replays a saved search page through Provider B's extractor and scorer
fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (Some(html_path), Some(query)) = (args.first(), args.get(1)) else {
        return Err(anyhow!("Usage: debug_scoring <saved_page.html> <query>"));
    };

    let config = AppConfig::load(DEFAULT_CONFIG_PATH)?;
    let html = std::fs::read_to_string(html_path).with_context(|| format!("Failed to read {}", html_path))?;

    let query_tokens = TextNormalizer::new(config.scoring.min_token_chars).normalize(query);
    let words: Vec<&str> = query_tokens.tokens.iter().map(|t| t.word.as_str()).collect();
    info!("Query: \"{}\" -> Words: [{}]", query, words.join(", "));

    let extractor = CandidateExtractor::for_sams(&config.sams);
    let StrategyResult::Found { strategy, candidates } = extractor.extract(&html) else {
        warn!("No strategy produced candidates for {}", html_path);
        return Ok(());
    };

    info!("--- Scoring {} candidates from {} ---", candidates.len(), strategy.as_str());
    let scorer = Scorer::new(config.scoring.clone());
    for candidate in &candidates {
        let score = scorer.score(&query_tokens, &candidate.name);
        info!("[{:.1}] {} | price {}", score, candidate.name, candidate.price);
    }

    match scorer.select_best(&query_tokens, candidates) {
        Some(winner) => info!("WINNER: {} (score {:.1}, price {})", winner.candidate.name, winner.score, winner.candidate.price),
        None => info!("WINNER: NONE"),
    }

    Ok(())
}
