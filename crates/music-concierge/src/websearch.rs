//! Web Search Integration
//!
//! Trait seam for the web-search/crawl service. The wrapped API is an
//! external collaborator; the concierge only needs keyword search with
//! bounded result counts.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::PageHit;

/// Web search client trait
#[async_trait]
pub trait WebSearchClient: Send + Sync {
    /// Search the web, returning at most `limit` hits
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<PageHit>>;

    /// Client name
    fn name(&self) -> &str;
}

/// Mock web search client with canned results
pub struct MockWebSearchClient;

#[async_trait]
impl WebSearchClient for MockWebSearchClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<PageHit>> {
        let hits = (1..=limit.max(1).min(10))
            .map(|i| PageHit {
                title: format!("Result {i} for '{query}'"),
                url: format!("https://example.com/{}/{i}", query.replace(' ', "-")),
                snippet: format!("Summary of result {i} matching '{query}'."),
            })
            .collect();
        Ok(hits)
    }

    fn name(&self) -> &str {
        "MockWebSearch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_search_respects_limit() {
        let client = MockWebSearchClient;
        let hits = client.search("rain songs history", 3).await.unwrap();
        assert_eq!(hits.len(), 3);
        assert!(hits[0].url.starts_with("https://"));
    }
}
