use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Result of resolving one name against one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub price: f64,
    pub url: String,
    pub is_real_price: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "ml")]
    MercadoLibre,
    #[serde(rename = "sams")]
    Sams,
}

/// An extracted (name, price) pair from a provider's result set
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub price: f64,
    pub raw: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
}

/// One completed name/provider resolution, as emitted by the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceUpdate {
    pub name: String,
    pub provider: ProviderId,
    pub quote: PriceQuote,
    /// Index of the concurrency window the resolution ran in
    pub window: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPrices {
    pub ml: PriceQuote,
    pub sams: PriceQuote,
}

/// Both provider quotes for one item name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPrices {
    pub name: String,
    pub prices: ProviderPrices,
}

impl PriceQuote {
    pub fn real(price: f64, url: impl Into<String>) -> Self {
        Self {
            price,
            url: url.into(),
            is_real_price: true,
        }
    }

    pub fn mock(price: f64, url: impl Into<String>) -> Self {
        Self {
            price,
            url: url.into(),
            is_real_price: false,
        }
    }

    /// Placeholder shown before any resolution has completed
    pub fn pending() -> Self {
        Self::mock(0.0, "")
    }
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::MercadoLibre => "ml",
            ProviderId::Sams => "sams",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Candidate {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            raw: None,
        }
    }

    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = Some(raw);
        self
    }
}

impl ProviderPrices {
    pub fn pending() -> Self {
        Self {
            ml: PriceQuote::pending(),
            sams: PriceQuote::pending(),
        }
    }

    pub fn get(&self, provider: ProviderId) -> &PriceQuote {
        match provider {
            ProviderId::MercadoLibre => &self.ml,
            ProviderId::Sams => &self.sams,
        }
    }

    pub fn set(&mut self, provider: ProviderId, quote: PriceQuote) {
        match provider {
            ProviderId::MercadoLibre => self.ml = quote,
            ProviderId::Sams => self.sams = quote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_json_shape() {
        let quote = PriceQuote::real(89.0, "https://www.sams.com.mx/search?q=huevo");
        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["price"], 89.0);
        assert_eq!(json["url"], "https://www.sams.com.mx/search?q=huevo");
        assert_eq!(json["isRealPrice"], true);
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_item_prices_keyed_by_provider() {
        let mut prices = ProviderPrices::pending();
        prices.set(ProviderId::Sams, PriceQuote::mock(120.0, "https://www.sams.com.mx/search?q=sal"));

        let item = ItemPrices {
            name: "sal".to_string(),
            prices,
        };
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["prices"]["sams"]["price"], 120.0);
        assert_eq!(json["prices"]["ml"]["isRealPrice"], false);
        assert_eq!(serde_json::to_value(ProviderId::MercadoLibre).unwrap(), "ml");
    }
}
