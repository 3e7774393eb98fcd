use async_trait::async_trait;

use crate::models::{PriceQuote, ProviderId};

/// Uniform "resolve price for name" contract.
///
/// Implementations never fail: transport, parse and authentication problems
/// all degrade to the provider's mock quote for that name.
#[async_trait]
pub trait PriceResolver: Send + Sync {
    fn provider(&self) -> ProviderId;

    async fn resolve_price(&self, name: &str) -> PriceQuote;
}
