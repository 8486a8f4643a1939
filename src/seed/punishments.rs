//! Seeds scraped from a public punishment log
//!
//! Each page of the log is an HTML table whose second column links to the
//! punished player's profile as `/<name>`. A random page is fetched and the
//! first row's link becomes the seed.

use crate::error::{NickForgeError, Result};
use crate::seed::SeedSource;
use crate::types::SeedConfig;
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use reqwest::Client;

/// Punishment log page prefix; the page number is appended
pub const PUNISHMENT_PAGE_URL: &str = "http://oc.tc/punishments?page=";

/// Pages sampled, as a half-open range
pub const PUNISHMENT_PAGE_RANGE: (u32, u32) = (1000, 10000);

const SOURCE_NAME: &str = "punishments";

/// Seed source that scrapes a random punishment log page
pub struct PunishmentPageSource {
    client: Client,
    config: SeedConfig,
    rng: Mutex<StdRng>,
}

impl PunishmentPageSource {
    pub fn new() -> Self {
        Self::with_config(SeedConfig::default())
    }

    pub fn with_config(config: SeedConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to create HTTP client: {}. Using default.", e);
                Client::new()
            });

        Self {
            client,
            config,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replace the page RNG with a deterministic one
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    fn next_page(&self) -> u32 {
        random_page(self.config.page_range, &mut *self.rng.lock())
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}{}", self.config.page_url, page)
    }
}

impl Default for PunishmentPageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SeedSource for PunishmentPageSource {
    async fn seed(&self) -> Result<String> {
        let page = self.next_page();
        let url = self.page_url(page);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| NickForgeError::seed_unavailable(SOURCE_NAME, format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NickForgeError::seed_unavailable(
                SOURCE_NAME,
                format!("{} returned status {}", url, status),
            ));
        }

        let html = response
            .text()
            .await
            .map_err(|e| NickForgeError::seed_unavailable(SOURCE_NAME, e.to_string()))?;

        let seed = extract_seed(&html)?;
        tracing::debug!(page, seed = %seed, "Scraped seed from punishment log");
        Ok(seed)
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}

/// Draw a page from the half-open `range`, or its start when the range is empty
fn random_page<R: Rng + ?Sized>(range: (u32, u32), rng: &mut R) -> u32 {
    let (low, high) = range;
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

/// Pull the player link out of the first body row's second cell and drop its
/// leading character
pub fn extract_seed(html: &str) -> Result<String> {
    let tbody = Regex::new(r"(?is)<tbody[^>]*>(.*?)</tbody>")
        .map_err(|e| NickForgeError::internal(e.to_string()))?;
    let cell = Regex::new(r"(?is)<td[^>]*>(.*?)</td>")
        .map_err(|e| NickForgeError::internal(e.to_string()))?;
    let anchor = Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*["']([^"']*)["']"#)
        .map_err(|e| NickForgeError::internal(e.to_string()))?;

    let body = tbody
        .captures(html)
        .and_then(|c| c.get(1))
        .ok_or_else(|| NickForgeError::seed_unavailable(SOURCE_NAME, "page has no table body"))?;

    let second_cell = cell
        .captures_iter(body.as_str())
        .nth(1)
        .and_then(|c| c.get(1))
        .ok_or_else(|| NickForgeError::seed_unavailable(SOURCE_NAME, "table row has no player cell"))?;

    let href = anchor
        .captures(second_cell.as_str())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| NickForgeError::seed_unavailable(SOURCE_NAME, "player cell has no link"))?;

    let seed: String = href.chars().skip(1).collect();
    if seed.is_empty() {
        return Err(NickForgeError::seed_unavailable(SOURCE_NAME, "player link is empty"));
    }
    Ok(seed)
}
