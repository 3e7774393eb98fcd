use serde::{Deserialize, Serialize};

/// Parameters of the deterministic stand-in price for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockPricing {
    /// Added to every character code before summing
    pub salt_per_char: u64,
    pub modulus: u64,
    pub base: u64,
}

/// Provider A: public listing pages, first entry only
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MercadoLibreConfig {
    pub search_url: String,
    /// URL reported with mock quotes
    pub fallback_url: String,
    pub listing_selector: String,
    pub price_selectors: Vec<String>,
    pub mock: MockPricing,
}

/// Provider B: authenticated search with the full extraction chain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamsConfig {
    pub search_url: String,
    pub login_url: String,
    pub env_email: String,
    pub env_password: String,
    pub embedded_json: EmbeddedJsonConfig,
    pub price_selectors: Vec<String>,
    pub mock: MockPricing,
}

/// Location of the application-embedded JSON payload and its item list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddedJsonConfig {
    pub script_id: String,
    /// Dot-separated path, numeric segments index arrays
    pub items_path: String,
    pub name_field: String,
    /// Tried in order, first positive price wins
    pub price_fields: Vec<String>,
}

impl MercadoLibreConfig {
    pub fn search_url_for(&self, query: &str) -> String {
        fill_query(&self.search_url, query)
    }

    pub fn fallback_url_for(&self, query: &str) -> String {
        fill_query(&self.fallback_url, query)
    }
}

impl SamsConfig {
    pub fn search_url_for(&self, query: &str) -> String {
        fill_query(&self.search_url, query)
    }
}

/// Substitute the percent-encoded query into a `{query}` template
pub fn fill_query(template: &str, query: &str) -> String {
    template.replace("{query}", &urlencoding::encode(query))
}

impl Default for MercadoLibreConfig {
    fn default() -> Self {
        Self {
            search_url: "https://listado.mercadolibre.com.mx/{query}_NoIndex_True".to_string(),
            fallback_url: "https://listado.mercadolibre.com.mx/{query}".to_string(),
            listing_selector: ".ui-search-layout__item".to_string(),
            price_selectors: vec![".andes-money-amount__fraction".to_string()],
            mock: MockPricing {
                salt_per_char: 0,
                modulus: 180,
                base: 20,
            },
        }
    }
}

impl Default for SamsConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.sams.com.mx/search?q={query}".to_string(),
            login_url: "https://www.sams.com.mx/api/v1/login".to_string(),
            env_email: "SAMS_EMAIL".to_string(),
            env_password: "SAMS_PASSWORD".to_string(),
            embedded_json: EmbeddedJsonConfig::default(),
            price_selectors: vec![".samsb-price-text".to_string(), ".curr-price".to_string()],
            mock: MockPricing {
                salt_per_char: 5,
                modulus: 250,
                base: 50,
            },
        }
    }
}

impl Default for EmbeddedJsonConfig {
    fn default() -> Self {
        Self {
            script_id: "__NEXT_DATA__".to_string(),
            items_path: "props.pageProps.initialData.searchResult.itemStacks.0.items".to_string(),
            name_field: "name".to_string(),
            price_fields: vec![
                "price".to_string(),
                "priceInfo.price".to_string(),
                "priceInfo.linePrice".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_percent_encoded() {
        let config = SamsConfig::default();
        assert_eq!(
            config.search_url_for("leche entera"),
            "https://www.sams.com.mx/search?q=leche%20entera"
        );
    }

    #[test]
    fn test_listing_and_fallback_urls_differ() {
        let config = MercadoLibreConfig::default();
        assert_eq!(
            config.search_url_for("huevo"),
            "https://listado.mercadolibre.com.mx/huevo_NoIndex_True"
        );
        assert_eq!(
            config.fallback_url_for("huevo"),
            "https://listado.mercadolibre.com.mx/huevo"
        );
    }
}
