use tracing::debug;

use crate::config::ScoringWeights;
use crate::models::{Candidate, ScoredCandidate};
use crate::processor::NormalizedQuery;

/// Lexical best-match heuristic over candidate names
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, query: &NormalizedQuery, candidate_name: &str) -> f64 {
        let name = candidate_name.to_lowercase();
        let mut score = 0.0;

        if let Some(head) = query.head() {
            if name.starts_with(head.root.as_str()) {
                score += self.weights.head_prefix_bonus;
            } else if name.contains(head.root.as_str()) {
                score += self.weights.head_substring_bonus;
            }
        }

        for token in query.rest() {
            if name.contains(token.word.as_str()) {
                score += self.weights.token_match;
            } else if token.root.chars().count() >= self.weights.min_root_chars
                && name.contains(token.root.as_str())
            {
                score += self.weights.root_match;
            }
        }

        score
    }

    /// Highest-scoring candidate; ties keep the earliest, a zero maximum is no match
    pub fn select_best(&self, query: &NormalizedQuery, candidates: Vec<Candidate>) -> Option<ScoredCandidate> {
        let mut best: Option<ScoredCandidate> = None;

        for candidate in candidates {
            let score = self.score(query, &candidate.name);
            debug!("Candidate \"{}\" score {:.1} price {}", candidate.name, score, candidate.price);

            let improves = best.as_ref().is_none_or(|current| score > current.score);
            if improves {
                best = Some(ScoredCandidate { candidate, score });
            }
        }

        best.filter(|winner| winner.score > 0.0)
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::TextNormalizer;

    fn query(text: &str) -> NormalizedQuery {
        TextNormalizer::default().normalize(text)
    }

    #[test]
    fn test_head_prefix_beats_substring() {
        let scorer = Scorer::default();
        let q = query("huevo");

        let prefix = scorer.score(&q, "Huevo Blanco 30 piezas");
        let substring = scorer.score(&q, "Cartera de huevo blanco");

        assert_eq!(prefix, 10.0);
        assert_eq!(substring, 3.0);
        assert!(prefix > substring);
    }

    #[test]
    fn test_remaining_tokens_exact_and_root() {
        let scorer = Scorer::default();
        let q = query("Leche Deslactosada Light Botellas");

        // head prefix 10, "deslactosada" exact 1, "light" exact 1, "botella" root 0.5
        assert_eq!(scorer.score(&q, "Leche Deslactosada Light 6 Botella 1L"), 12.5);
        // no head match, only "light" exact
        assert_eq!(scorer.score(&q, "Yogurt Light"), 1.0);
    }

    #[test]
    fn test_short_roots_never_score() {
        let scorer = Scorer::default();
        // "uvas" roots to "uva", exactly three characters
        let q = query("frutas uvas");
        assert_eq!(scorer.score(&q, "uva verde"), 0.5);

        let weights = ScoringWeights {
            min_root_chars: 4,
            ..ScoringWeights::default()
        };
        assert_eq!(Scorer::new(weights).score(&q, "uva verde"), 0.0);
    }

    #[test]
    fn test_empty_query_scores_zero() {
        let scorer = Scorer::default();
        let q = query("");
        assert_eq!(scorer.score(&q, "Huevo Orgánico Grande"), 0.0);
        assert!(scorer.select_best(&q, vec![Candidate::new("Huevo", 10.0)]).is_none());
    }

    #[test]
    fn test_select_best_picks_maximum() {
        let scorer = Scorer::default();
        let q = query("Huevos Orgánicos");
        let candidates = vec![
            Candidate::new("Tortilla de harina", 35.0),
            Candidate::new("Huevo Orgánico Grande", 89.0),
            Candidate::new("Pasta al huevo", 22.0),
        ];

        let winner = scorer.select_best(&q, candidates).unwrap();
        assert_eq!(winner.candidate.name, "Huevo Orgánico Grande");
        assert_eq!(winner.candidate.price, 89.0);
        assert!(winner.score >= 10.0);
    }

    #[test]
    fn test_ties_keep_first_extracted() {
        let scorer = Scorer::default();
        let q = query("arroz");
        let candidates = vec![
            Candidate::new("Arroz Super Extra 1kg", 32.0),
            Candidate::new("Arroz Integral 1kg", 41.0),
        ];

        let winner = scorer.select_best(&q, candidates).unwrap();
        assert_eq!(winner.candidate.price, 32.0);
    }

    #[test]
    fn test_zero_maximum_is_no_match() {
        let scorer = Scorer::default();
        let q = query("xyz123nonexistent");
        let candidates = vec![
            Candidate::new("Huevo Orgánico Grande", 89.0),
            Candidate::new("Leche Entera", 25.0),
        ];

        assert!(scorer.select_best(&q, candidates).is_none());
    }

    #[test]
    fn test_scores_never_negative() {
        let scorer = Scorer::default();
        for text in ["", "a b", "queso panela", "Jabón Líquido Manos"] {
            let q = query(text);
            for name in ["", "queso", "Jabón de manos", "zzz"] {
                assert!(scorer.score(&q, name) >= 0.0);
            }
        }
    }
}
