use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::config::{EmbeddedJsonConfig, MercadoLibreConfig, SamsConfig};
use crate::models::Candidate;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)").unwrap());

static STRUCTURED_DATA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    EmbeddedJson,
    StructuredData,
    VisualSelector,
}

/// Outcome of a single extraction strategy
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyResult {
    /// At least one candidate with a positive price
    Found {
        strategy: StrategyKind,
        candidates: Vec<Candidate>,
    },
    NotApplicable,
}

/// How price text found in the DOM is turned into a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceFormat {
    /// Every non-digit is dropped, "1.299" reads as 1299
    DigitsOnly,
    /// Currency symbols and thousands separators are dropped, decimals kept
    Decimal,
}

pub enum Strategy {
    EmbeddedJson(EmbeddedJsonConfig),
    StructuredData,
    VisualSelector(VisualSelectorStrategy),
}

/// Reads price text out of known DOM nodes
pub struct VisualSelectorStrategy {
    scope: Option<Selector>,
    price_selectors: Vec<Selector>,
    format: PriceFormat,
}

/// Ordered chain of strategies; the first one that finds something wins
pub struct CandidateExtractor {
    strategies: Vec<Strategy>,
}

impl StrategyKind {
    /// Ranked result sets go through the scorer, the others carry a page-asserted price
    pub fn is_ranked(&self) -> bool {
        matches!(self, StrategyKind::EmbeddedJson)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::EmbeddedJson => "embedded-json",
            StrategyKind::StructuredData => "structured-data",
            StrategyKind::VisualSelector => "visual-selector",
        }
    }
}

impl StrategyResult {
    fn from_candidates(strategy: StrategyKind, candidates: Vec<Candidate>) -> Self {
        if candidates.is_empty() {
            StrategyResult::NotApplicable
        } else {
            StrategyResult::Found { strategy, candidates }
        }
    }
}

impl CandidateExtractor {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    /// Embedded JSON, then structured data, then visual selectors
    pub fn for_sams(config: &SamsConfig) -> Self {
        Self::new(vec![
            Strategy::EmbeddedJson(config.embedded_json.clone()),
            Strategy::StructuredData,
            Strategy::VisualSelector(VisualSelectorStrategy::new(
                None,
                &config.price_selectors,
                PriceFormat::Decimal,
            )),
        ])
    }

    /// Visual selectors over the first listing entry only
    pub fn for_mercadolibre(config: &MercadoLibreConfig) -> Self {
        Self::new(vec![Strategy::VisualSelector(VisualSelectorStrategy::new(
            Some(config.listing_selector.as_str()),
            &config.price_selectors,
            PriceFormat::DigitsOnly,
        ))])
    }

    pub fn extract(&self, html: &str) -> StrategyResult {
        let document = Html::parse_document(html);

        for strategy in &self.strategies {
            let result = strategy.apply(&document);
            match &result {
                StrategyResult::Found { strategy, candidates } => {
                    info!("{} strategy found {} candidates", strategy.as_str(), candidates.len());
                    return result;
                }
                StrategyResult::NotApplicable => {
                    debug!("{} strategy produced nothing", strategy.kind().as_str());
                }
            }
        }

        StrategyResult::NotApplicable
    }
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::EmbeddedJson(_) => StrategyKind::EmbeddedJson,
            Strategy::StructuredData => StrategyKind::StructuredData,
            Strategy::VisualSelector(_) => StrategyKind::VisualSelector,
        }
    }

    pub fn apply(&self, document: &Html) -> StrategyResult {
        match self {
            Strategy::EmbeddedJson(config) => extract_embedded_json(document, config),
            Strategy::StructuredData => extract_structured_data(document),
            Strategy::VisualSelector(visual) => visual.extract(document),
        }
    }
}

fn extract_embedded_json(document: &Html, config: &EmbeddedJsonConfig) -> StrategyResult {
    let selector_str = format!(r#"script[id="{}"]"#, config.script_id);
    let Ok(selector) = Selector::parse(&selector_str) else {
        warn!("Invalid embedded JSON script id: {}", config.script_id);
        return StrategyResult::NotApplicable;
    };

    let Some(script) = document.select(&selector).next() else {
        return StrategyResult::NotApplicable;
    };

    let payload = script.text().collect::<String>();
    let json: Value = match serde_json::from_str(&payload) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to parse {} payload: {}", config.script_id, e);
            return StrategyResult::NotApplicable;
        }
    };

    let Some(items) = value_at_path(&json, &config.items_path).and_then(Value::as_array) else {
        return StrategyResult::NotApplicable;
    };
    info!("Found {} items in {} payload", items.len(), config.script_id);

    let candidates = items
        .iter()
        .filter_map(|item| {
            let name = item
                .get(&config.name_field)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())?;

            let price = config
                .price_fields
                .iter()
                .filter_map(|field| value_at_path(item, field).and_then(json_price))
                .next()?;

            Some(Candidate::new(name, price).with_raw(item.clone()))
        })
        .collect();

    StrategyResult::from_candidates(StrategyKind::EmbeddedJson, candidates)
}

fn extract_structured_data(document: &Html) -> StrategyResult {
    for script in document.select(&STRUCTURED_DATA) {
        let payload = script.text().collect::<String>();
        let Ok(json) = serde_json::from_str::<Value>(&payload) else {
            continue;
        };

        let blocks: Vec<&Value> = match &json {
            Value::Array(blocks) => blocks.iter().collect(),
            block => match block.get("@graph").and_then(Value::as_array) {
                Some(graph) => graph.iter().collect(),
                None => vec![block],
            },
        };

        if let Some(candidate) = blocks.into_iter().find_map(structured_candidate) {
            return StrategyResult::from_candidates(StrategyKind::StructuredData, vec![candidate]);
        }
    }

    StrategyResult::NotApplicable
}

/// A `Product` with an offer price, or the first element of an `ItemList`
fn structured_candidate(block: &Value) -> Option<Candidate> {
    let (entry, price) = match block.get("@type").and_then(Value::as_str)? {
        "Product" => (block, offer_price(block)?),
        "ItemList" => {
            let first = block.get("itemListElement")?.get(0)?;
            let entry = first.get("item").unwrap_or(first);
            (entry, offer_price(first).or_else(|| offer_price(entry))?)
        }
        _ => return None,
    };

    let name = entry.get("name").and_then(Value::as_str).unwrap_or_default();
    Some(Candidate::new(name.trim(), price).with_raw(block.clone()))
}

fn offer_price(entry: &Value) -> Option<f64> {
    let offers = entry.get("offers")?;
    let offer = match offers {
        Value::Array(list) => list.first()?,
        offer => offer,
    };
    offer.get("price").and_then(json_price)
}

impl VisualSelectorStrategy {
    pub fn new(scope: Option<&str>, price_selectors: &[String], format: PriceFormat) -> Self {
        let scope = scope.and_then(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(_) => {
                warn!("Invalid listing selector: {}", s);
                None
            }
        });

        let price_selectors = price_selectors
            .iter()
            .filter_map(|s| match Selector::parse(s) {
                Ok(selector) => Some(selector),
                Err(_) => {
                    warn!("Invalid price selector: {}", s);
                    None
                }
            })
            .collect();

        Self {
            scope,
            price_selectors,
            format,
        }
    }

    fn extract(&self, document: &Html) -> StrategyResult {
        let price = match &self.scope {
            Some(scope) => match document.select(scope).next() {
                Some(entry) => self.first_price(|selector| {
                    entry.select(selector).next().map(|e| e.text().collect::<String>())
                }),
                None => None,
            },
            None => self.first_price(|selector| {
                document.select(selector).next().map(|e| e.text().collect::<String>())
            }),
        };

        match price {
            Some(price) => StrategyResult::from_candidates(StrategyKind::VisualSelector, vec![Candidate::new("", price)]),
            None => StrategyResult::NotApplicable,
        }
    }

    /// Text of the first selector that matches non-empty, parsed per `format`
    fn first_price<F>(&self, text_for: F) -> Option<f64>
    where
        F: Fn(&Selector) -> Option<String>,
    {
        let text = self
            .price_selectors
            .iter()
            .filter_map(|selector| text_for(selector))
            .find(|text| !text.trim().is_empty())?;

        match self.format {
            PriceFormat::DigitsOnly => parse_digits_price(&text),
            PriceFormat::Decimal => parse_decimal_price(&text),
        }
    }
}

/// Walk a dot-separated path, numeric segments index into arrays
pub fn value_at_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
            _ => current.get(segment),
        })
}

/// Positive price from a raw number or a formatted currency string
pub fn json_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|price| *price > 0.0),
        Value::String(s) => parse_decimal_price(s),
        _ => None,
    }
}

/// "$1,299.50" -> 1299.5; the number must lead the text, so "-$45" is rejected
pub fn parse_decimal_price(text: &str) -> Option<f64> {
    let cleaned = text.replace(['$', ','], "");
    LEADING_NUMBER
        .find(cleaned.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|price| *price > 0.0)
}

/// "1.299" -> 1299
pub fn parse_digits_price(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse::<u64>().ok().map(|price| price as f64).filter(|price| *price > 0.0)
}
