//! Crawl coordination - breadth-first traversal of the research graph
//!
//! The crawler owns the frontier queue and the visited set, both keyed by
//! normalized URL. Pages that fail to fetch or parse are recorded as
//! synthetic error nodes and never abort the traversal; only caller
//! configuration mistakes (an empty root set) fail the crawl itself.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::time::Duration;

use url::Url;

use crate::crawler::fetcher::Fetch;
use crate::crawler::parser::ParsePage;
use crate::records::RawResearchRecord;
use crate::url::normalize_research_url;
use crate::{Result, TrawlError};

/// Breadth-first research-graph crawler, generic over its fetch and parse
/// collaborators.
pub struct ResearchCrawler<F, P> {
    fetcher: F,
    parser: P,
    delay: Duration,
}

impl<F: Fetch, P: ParsePage> ResearchCrawler<F, P> {
    pub fn new(fetcher: F, parser: P, delay: Duration) -> Self {
        Self {
            fetcher,
            parser,
            delay,
        }
    }

    /// Crawls all research pages reachable from `roots` and returns the
    /// URL-keyed raw record table.
    ///
    /// Traversal order affects only log output: the result is a map keyed
    /// by normalized URL and edge lists are deduplicated downstream.
    pub async fn crawl(
        &self,
        roots: &[String],
        base: &Url,
    ) -> Result<BTreeMap<String, RawResearchRecord>> {
        if roots.is_empty() {
            return Err(TrawlError::NoRoots);
        }

        let mut queue: VecDeque<String> = VecDeque::new();
        for root in roots {
            queue.push_back(normalize_research_url(base, root)?);
        }

        let mut visited: HashSet<String> = HashSet::new();
        let mut records_by_url: BTreeMap<String, RawResearchRecord> = BTreeMap::new();

        while let Some(url) = queue.pop_front() {
            // Re-enqueueing an already-visited URL is tolerated; marking
            // before processing keeps cycles from requeueing forever.
            if !visited.insert(url.clone()) {
                continue;
            }

            tracing::info!(%url, "fetching research page");

            match self.fetch_and_parse(&url).await {
                Ok(record) => {
                    for link in &record.allows_links_raw {
                        if !visited.contains(&link.url) {
                            queue.push_back(link.url.clone());
                        }
                    }
                    records_by_url.insert(url, record);
                }
                Err(err) => {
                    tracing::warn!(%url, error = %err, "page failed; recording error node");
                    records_by_url.insert(url.clone(), RawResearchRecord::failed(&url, err.to_string()));
                }
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        tracing::info!(pages = records_by_url.len(), "crawl complete");
        Ok(records_by_url)
    }

    async fn fetch_and_parse(&self, url: &str) -> Result<RawResearchRecord> {
        let html = self.fetcher.fetch(url).await?;
        self.parser.parse(&html, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::records::{RawLink, ResearchVariant};

    /// Scripted fetcher serving canned bodies; unknown URLs fail.
    struct MapFetcher {
        pages: HashMap<String, String>,
    }

    impl Fetch for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| TrawlError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    /// Parser that reads a tiny line format: each body line is
    /// `allow <url> <title>`.
    struct LineParser;

    impl ParsePage for LineParser {
        fn parse(&self, html: &str, page_url: &str) -> Result<RawResearchRecord> {
            let mut allows = Vec::new();
            for line in html.lines() {
                if let Some(rest) = line.strip_prefix("allow ") {
                    let (url, title) = rest.split_once(' ').unwrap_or((rest, ""));
                    allows.push(RawLink::new(url, title));
                }
            }
            let name = crate::url::fallback_name_from_title(None, page_url);
            Ok(RawResearchRecord {
                id: name.clone(),
                title: None,
                internal_name: name,
                url: page_url.to_string(),
                allows_links_raw: allows,
                required_links_raw: Vec::new(),
                is_space_age_exclusive: false,
                selected_variant: ResearchVariant::Single,
                research_type: None,
                research_science: None,
                research_condition_text: None,
                error: None,
            })
        }
    }

    fn base() -> Url {
        Url::parse("https://wiki.test").unwrap()
    }

    fn page(url: &str, allows: &[&str]) -> (String, String) {
        let body = allows
            .iter()
            .map(|u| format!("allow {} ", u))
            .collect::<Vec<_>>()
            .join("\n");
        (url.to_string(), body)
    }

    fn crawler(pages: Vec<(String, String)>) -> ResearchCrawler<MapFetcher, LineParser> {
        ResearchCrawler::new(
            MapFetcher {
                pages: pages.into_iter().collect(),
            },
            LineParser,
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn test_empty_roots_rejected() {
        let crawler = crawler(vec![]);
        let result = crawler.crawl(&[], &base()).await;
        assert!(matches!(result, Err(TrawlError::NoRoots)));
    }

    #[tokio::test]
    async fn test_breadth_first_discovery() {
        let crawler = crawler(vec![
            page("https://wiki.test/A", &["https://wiki.test/B", "https://wiki.test/C"]),
            page("https://wiki.test/B", &["https://wiki.test/D"]),
            page("https://wiki.test/C", &[]),
            page("https://wiki.test/D", &[]),
        ]);

        let records = crawler
            .crawl(&["https://wiki.test/A".to_string()], &base())
            .await
            .unwrap();

        assert_eq!(records.len(), 4);
        assert!(records.contains_key("https://wiki.test/D"));
        assert!(records.values().all(|r| r.error.is_none()));
    }

    #[tokio::test]
    async fn test_cycles_terminate() {
        let crawler = crawler(vec![
            page("https://wiki.test/A", &["https://wiki.test/B"]),
            page("https://wiki.test/B", &["https://wiki.test/A"]),
        ]);

        let records = crawler
            .crawl(&["https://wiki.test/A".to_string()], &base())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_fault_isolation() {
        // C is reachable but not served: exactly one error node, crawl
        // still covers everything else.
        let crawler = crawler(vec![
            page("https://wiki.test/A", &["https://wiki.test/B", "https://wiki.test/C"]),
            page("https://wiki.test/B", &[]),
        ]);

        let records = crawler
            .crawl(&["https://wiki.test/A".to_string()], &base())
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        let failed: Vec<_> = records.values().filter(|r| r.error.is_some()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].url, "https://wiki.test/C");
        assert_eq!(failed[0].internal_name, "c");
        assert!(failed[0].allows_links_raw.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_roots_visited_once() {
        let crawler = crawler(vec![page("https://wiki.test/A", &[])]);

        let records = crawler
            .crawl(
                &[
                    "https://wiki.test/A".to_string(),
                    "https://wiki.test/A".to_string(),
                ],
                &base(),
            )
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
    }
}
