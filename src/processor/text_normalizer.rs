/// A query word together with its weak singular form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryToken {
    pub word: String,
    pub root: String,
}

/// Lowercase word tokens of a query, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub tokens: Vec<QueryToken>,
}

pub struct TextNormalizer {
    min_token_chars: usize,
}

impl TextNormalizer {
    pub fn new(min_token_chars: usize) -> Self {
        Self { min_token_chars }
    }

    pub fn normalize(&self, query: &str) -> NormalizedQuery {
        let tokens = query
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|word| word.chars().count() >= self.min_token_chars)
            .map(|word| QueryToken {
                root: singular_root(&word).to_string(),
                word,
            })
            .collect();

        NormalizedQuery { tokens }
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(3)
    }
}

impl NormalizedQuery {
    /// First token, presumed to name the product category
    pub fn head(&self) -> Option<&QueryToken> {
        self.tokens.first()
    }

    /// Tokens after the head word
    pub fn rest(&self) -> &[QueryToken] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Strip a single trailing "s"; no other stemming
pub fn singular_root(word: &str) -> &str {
    word.strip_suffix('s').unwrap_or(word)
}
