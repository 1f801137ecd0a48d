//! Offline catalyst pool.
//!
//! Used whenever quotes are disabled or no API key is configured. Picks a
//! random line from a small stoic pool so repeated sessions do not always
//! show the same phrase.

use async_trait::async_trait;
use rand::seq::SliceRandom;

use super::{QuoteProvider, EMPTY_RESPONSE_FALLBACK, FALLBACK_TIPS};

const POOL: [&str; 8] = [
    "Stay focused. Stay disciplined.",
    "The pain of discipline is far less than the pain of regret.",
    "You have power over your mind, not outside events.",
    "Do the work. The mood follows.",
    "One task. One hour. Nothing else exists.",
    "Distraction is a choice you are not making today.",
    "Begin. The rest is momentum.",
    "What stands in the way becomes the way.",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CannedQuotes;

impl CannedQuotes {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QuoteProvider for CannedQuotes {
    async fn quote(&self, _context: &str) -> String {
        POOL.choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(EMPTY_RESPONSE_FALLBACK)
            .to_string()
    }

    async fn tips(&self) -> Vec<String> {
        FALLBACK_TIPS.iter().map(|t| (*t).to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn quote_comes_from_the_pool() {
        let q = CannedQuotes::new().quote("25 minute session").await;
        assert!(POOL.contains(&q.as_str()));
    }

    #[tokio::test]
    async fn tips_are_exactly_three() {
        let tips = CannedQuotes::new().tips().await;
        assert_eq!(tips.len(), 3);
        assert_eq!(tips, FALLBACK_TIPS.to_vec());
    }
}
