use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::MercadoLibreConfig;
use crate::fetcher::{FetchRequest, PriceResolver, Transport};
use crate::models::{PriceQuote, ProviderId};
use crate::processor::{CandidateExtractor, StrategyResult, fallback_quote};

/// Provider A: first entry of the public listing page, no authentication
pub struct MercadoLibreResolver {
    transport: Arc<dyn Transport>,
    config: MercadoLibreConfig,
    extractor: CandidateExtractor,
}

impl MercadoLibreResolver {
    pub fn new(transport: Arc<dyn Transport>, config: MercadoLibreConfig) -> Self {
        let extractor = CandidateExtractor::for_mercadolibre(&config);
        Self {
            transport,
            config,
            extractor,
        }
    }

    async fn scrape(&self, url: &str) -> Result<Option<f64>> {
        let response = self.transport.get(FetchRequest::new(url)).await?;
        Ok(self.price_from_page(&response.body))
    }

    fn price_from_page(&self, html: &str) -> Option<f64> {
        match self.extractor.extract(html) {
            StrategyResult::Found { candidates, .. } => candidates.first().map(|c| c.price),
            StrategyResult::NotApplicable => None,
        }
    }

    fn mock_quote(&self, name: &str) -> PriceQuote {
        fallback_quote(name, &self.config.mock, self.config.fallback_url_for(name))
    }
}

#[async_trait]
impl PriceResolver for MercadoLibreResolver {
    fn provider(&self) -> ProviderId {
        ProviderId::MercadoLibre
    }

    async fn resolve_price(&self, name: &str) -> PriceQuote {
        let url = self.config.search_url_for(name);

        match self.scrape(&url).await {
            Ok(Some(price)) => {
                info!("[ML] Listing price for \"{}\": {}", name, price);
                PriceQuote::real(price, url)
            }
            Ok(None) => {
                debug!("[ML] No price found for \"{}\", using estimate", name);
                self.mock_quote(name)
            }
            Err(e) => {
                debug!("[ML] Scraping failed for \"{}\": {}", name, e);
                self.mock_quote(name)
            }
        }
    }
}
