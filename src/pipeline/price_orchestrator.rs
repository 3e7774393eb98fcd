use futures::stream::{self, BoxStream, FuturesUnordered, Stream, StreamExt};
use std::sync::Arc;
use tracing::info;

use crate::config::{AppConfig, ProviderCredentials};
use crate::fetcher::{MercadoLibreResolver, PriceResolver, SamsResolver, Transport};
use crate::models::{ItemPrices, PriceUpdate, ProviderPrices};

/// Fans price resolution out over both providers in fixed-size windows.
///
/// A window of names runs concurrently and each result is yielded as soon as
/// it completes; the next window starts only once the current one is drained.
/// Streams are lazy: nothing is fetched until polled, and dropping a stream
/// abandons the remaining windows.
pub struct PriceOrchestrator {
    ml: Arc<dyn PriceResolver>,
    sams: Arc<dyn PriceResolver>,
    window: usize,
}

impl PriceOrchestrator {
    pub fn new(ml: Arc<dyn PriceResolver>, sams: Arc<dyn PriceResolver>, window: usize) -> Self {
        Self {
            ml,
            sams,
            window: window.max(1),
        }
    }

    /// Both production resolvers over a shared transport; Provider B credentials come from the environment
    pub fn from_config(config: &AppConfig, transport: Arc<dyn Transport>) -> Self {
        let credentials = ProviderCredentials::from_env(&config.sams.env_email, &config.sams.env_password);
        if credentials.is_none() {
            info!("No {} / {} in environment, Sams lookups run unauthenticated", config.sams.env_email, config.sams.env_password);
        }

        let ml = MercadoLibreResolver::new(Arc::clone(&transport), config.mercadolibre.clone());
        let sams = SamsResolver::new(transport, config.sams.clone(), config.scoring.clone(), credentials);

        Self::new(Arc::new(ml), Arc::new(sams), config.batch.concurrency)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// One update per name and provider; at most `window x 2` resolutions in flight
    pub fn resolve_all(&self, names: Vec<String>) -> BoxStream<'static, PriceUpdate> {
        let resolvers = [Arc::clone(&self.ml), Arc::clone(&self.sams)];

        windows(names, self.window)
            .flat_map(move |(window, names)| {
                info!("Resolving price window {} ({} names)", window, names.len());

                names
                    .into_iter()
                    .flat_map(|name| resolvers.iter().map(move |resolver| (name.clone(), Arc::clone(resolver))))
                    .map(move |(name, resolver)| async move {
                        let quote = resolver.resolve_price(&name).await;
                        PriceUpdate {
                            provider: resolver.provider(),
                            name,
                            quote,
                            window,
                        }
                    })
                    .collect::<FuturesUnordered<_>>()
            })
            .boxed()
    }

    /// Both provider quotes per name, yielded as each name completes
    pub fn resolve_prices(&self, names: Vec<String>) -> BoxStream<'static, ItemPrices> {
        let ml = Arc::clone(&self.ml);
        let sams = Arc::clone(&self.sams);

        windows(names, self.window)
            .flat_map(move |(window, names)| {
                info!("Resolving price window {} ({} names)", window, names.len());

                names
                    .into_iter()
                    .map(|name| {
                        let ml = Arc::clone(&ml);
                        let sams = Arc::clone(&sams);
                        async move {
                            let prices = resolve_both(ml.as_ref(), sams.as_ref(), &name).await;
                            ItemPrices { name, prices }
                        }
                    })
                    .collect::<FuturesUnordered<_>>()
            })
            .boxed()
    }

    /// Single-name lookup against both providers concurrently
    pub async fn fetch_product_prices(&self, name: &str) -> ProviderPrices {
        info!("[PriceCheck] Fetching live prices for: {}", name);
        resolve_both(self.ml.as_ref(), self.sams.as_ref(), name).await
    }
}

async fn resolve_both(ml: &dyn PriceResolver, sams: &dyn PriceResolver, name: &str) -> ProviderPrices {
    let (ml, sams) = futures::join!(ml.resolve_price(name), sams.resolve_price(name));
    ProviderPrices { ml, sams }
}

fn windows(names: Vec<String>, size: usize) -> impl Stream<Item = (usize, Vec<String>)> {
    let chunks: Vec<Vec<String>> = names.chunks(size.max(1)).map(<[String]>::to_vec).collect();
    stream::iter(chunks.into_iter().enumerate())
}
