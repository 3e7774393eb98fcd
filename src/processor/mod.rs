pub mod candidate_extractor;
pub mod mock_price;
pub mod scorer;
pub mod text_normalizer;

pub use candidate_extractor::*;
pub use mock_price::*;
pub use scorer::*;
pub use text_normalizer::*;
