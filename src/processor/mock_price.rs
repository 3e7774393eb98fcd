use crate::config::MockPricing;
use crate::models::PriceQuote;

/// Deterministic stand-in price seeded from the query text.
///
/// Character codes are UTF-16 units so accented queries land on the same
/// values the web client computes.
pub fn fallback_price(query: &str, pricing: &MockPricing) -> f64 {
    let seed: u64 = query
        .encode_utf16()
        .map(|unit| u64::from(unit) + pricing.salt_per_char)
        .sum();

    ((seed % pricing.modulus) + pricing.base) as f64
}

pub fn fallback_quote(query: &str, pricing: &MockPricing, url: impl Into<String>) -> PriceQuote {
    PriceQuote::mock(fallback_price(query, pricing), url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MercadoLibreConfig, SamsConfig};

    #[test]
    fn test_fallback_is_deterministic() {
        let pricing = SamsConfig::default().mock;
        let first = fallback_price("xyz123nonexistent", &pricing);
        let second = fallback_price("xyz123nonexistent", &pricing);
        assert_eq!(first, second);
    }

    #[test]
    fn test_known_values() {
        // "abc" = 97 + 98 + 99 = 294
        let ml = MercadoLibreConfig::default().mock;
        assert_eq!(fallback_price("abc", &ml), (294 % 180 + 20) as f64);

        // salted: 294 + 3 * 5 = 309
        let sams = SamsConfig::default().mock;
        assert_eq!(fallback_price("abc", &sams), (309 % 250 + 50) as f64);
    }

    #[test]
    fn test_prices_stay_in_provider_range() {
        let ml = MercadoLibreConfig::default().mock;
        let sams = SamsConfig::default().mock;

        for query in ["", "sal", "Huevos Orgánicos", "Papel higiénico 12 rollos"] {
            let ml_price = fallback_price(query, &ml);
            assert!((20.0..200.0).contains(&ml_price));

            let sams_price = fallback_price(query, &sams);
            assert!((50.0..300.0).contains(&sams_price));
        }
    }

    #[test]
    fn test_quote_is_never_real() {
        let quote = fallback_quote("leche", &SamsConfig::default().mock, "https://www.sams.com.mx/search?q=leche");
        assert!(!quote.is_real_price);
        assert_eq!(quote.url, "https://www.sams.com.mx/search?q=leche");
    }
}
