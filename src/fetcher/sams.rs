use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{ProviderCredentials, SamsConfig, ScoringWeights};
use crate::fetcher::{FetchRequest, PriceResolver, ProviderSession, Transport};
use crate::models::{PriceQuote, ProviderId};
use crate::processor::{CandidateExtractor, Scorer, StrategyResult, TextNormalizer, fallback_quote};

/// Provider B: best-effort login, uncached search, full extraction chain and scoring
pub struct SamsResolver {
    transport: Arc<dyn Transport>,
    config: SamsConfig,
    credentials: Option<ProviderCredentials>,
    normalizer: TextNormalizer,
    scorer: Scorer,
    extractor: CandidateExtractor,
}

impl SamsResolver {
    pub fn new(
        transport: Arc<dyn Transport>,
        config: SamsConfig,
        weights: ScoringWeights,
        credentials: Option<ProviderCredentials>,
    ) -> Self {
        let extractor = CandidateExtractor::for_sams(&config);
        Self {
            transport,
            config,
            credentials,
            normalizer: TextNormalizer::new(weights.min_token_chars),
            scorer: Scorer::new(weights),
            extractor,
        }
    }

    /// Never fails; a declined or broken login just means searching anonymously
    async fn login(&self) -> Option<ProviderSession> {
        let Some(ref credentials) = self.credentials else {
            info!("[Sams] No credentials configured, searching unauthenticated");
            return None;
        };

        info!("[Sams] Credentials found. Attempting login for {}", credentials.email);
        let body = json!({
            "email": credentials.email,
            "password": credentials.password,
        });

        match self.transport.post_json(&self.config.login_url, &body).await {
            Ok(response) => {
                let session = ProviderSession::from_cookies(&response.cookies);
                if session.is_some() {
                    info!("[Sams] Login accepted, session cookie obtained");
                } else {
                    warn!("[Sams] Login response carried no session cookie");
                }
                session
            }
            Err(e) => {
                warn!("[Sams] Login attempt declined: {}", e);
                None
            }
        }
    }

    async fn scrape(&self, name: &str, url: &str) -> Result<Option<PriceQuote>> {
        let session = self.login().await;

        info!("[Sams] Scraping URL: {}", url);
        let request = FetchRequest::new(url).with_session(session.as_ref()).no_cache();
        let response = self.transport.get(request).await?;

        Ok(self.select_quote(name, url, &response.body))
    }

    /// Run the extraction chain over a search page and pick the quote, if any
    pub fn select_quote(&self, name: &str, url: &str, html: &str) -> Option<PriceQuote> {
        match self.extractor.extract(html) {
            StrategyResult::Found { strategy, candidates } if strategy.is_ranked() => {
                let query = self.normalizer.normalize(name);
                info!("[Sams] Scoring {} candidates for \"{}\"", candidates.len(), name);

                match self.scorer.select_best(&query, candidates) {
                    Some(winner) => {
                        info!(
                            "[Sams] Selected best match: \"{}\" (score {:.1}) - price {}",
                            winner.candidate.name, winner.score, winner.candidate.price
                        );
                        Some(PriceQuote::real(winner.candidate.price, url))
                    }
                    None => {
                        info!("[Sams] No good match found for \"{}\"", name);
                        None
                    }
                }
            }
            StrategyResult::Found { strategy, candidates } => {
                let first = candidates.into_iter().next()?;
                info!("[Sams] Found price via {}: {}", strategy.as_str(), first.price);
                Some(PriceQuote::real(first.price, url))
            }
            StrategyResult::NotApplicable => {
                info!("[Sams] No price found on search page for \"{}\"", name);
                None
            }
        }
    }

    fn mock_quote(&self, name: &str) -> PriceQuote {
        fallback_quote(name, &self.config.mock, self.config.search_url_for(name))
    }
}

#[async_trait]
impl PriceResolver for SamsResolver {
    fn provider(&self) -> ProviderId {
        ProviderId::Sams
    }

    async fn resolve_price(&self, name: &str) -> PriceQuote {
        info!("[Sams] Estimating price for: \"{}\"", name);
        let url = self.config.search_url_for(name);

        match self.scrape(name, &url).await {
            Ok(Some(quote)) => quote,
            Ok(None) => self.mock_quote(name),
            Err(e) => {
                warn!("[Sams] Scraping failed for \"{}\": {}", name, e);
                self.mock_quote(name)
            }
        }
    }
}
