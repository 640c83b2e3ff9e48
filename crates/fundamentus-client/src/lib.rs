use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, USER_AGENT};
use reqwest::{Client, StatusCode};
use valuation_core::{FieldSet, ScrapeError};

pub mod extract;

pub use extract::{coerce_number, extract_fields, NOT_FOUND_MARKER};

/// Details page prefix; the ticker is appended as-is.
pub const BASE_URL: &str = "http://www.fundamentus.com.br/detalhes.php?papel=";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows; U; Windows NT 6.1; rv:2.2) Gecko/20110201";
const HTML_ACCEPT: &str = "text/html, text/plain, text/css, text/sgml, */*;q=0.01";

/// Source of stock details pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the details page for an already normalized ticker, as a single line of text.
    async fn fetch_page(&self, ticker: &str) -> Result<String, ScrapeError>;

    /// Fetch and extract in one step.
    async fn fetch_fields(&self, ticker: &str) -> Result<FieldSet, ScrapeError> {
        let page = self.fetch_page(ticker).await?;
        extract_fields(&page)
    }
}

#[derive(Clone)]
pub struct FundamentusClient {
    base_url: String,
    client: Client,
}

impl FundamentusClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(HTML_ACCEPT));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

        // One attempt, no timeout, redirects are returned as-is.
        let client = Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|e| {
                tracing::error!(
                    error = %e,
                    "failed to build details page client; falling back to reqwest defaults"
                );
                Client::new()
            });

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The ticker is concatenated without escaping.
    pub fn page_url(&self, ticker: &str) -> String {
        format!("{}{}", self.base_url, ticker)
    }
}

impl Default for FundamentusClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageSource for FundamentusClient {
    async fn fetch_page(&self, ticker: &str) -> Result<String, ScrapeError> {
        let url = self.page_url(ticker);
        tracing::debug!(%url, "fetching details page");

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!(%url, error = %e, "details page request failed");
            ScrapeError::Upstream(e.to_string())
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(%url, %status, "details page returned non-200 status");
            return Err(ScrapeError::Upstream(format!("HTTP {}", status)));
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(%url, error = %e, "failed to read details page body");
            ScrapeError::Upstream(e.to_string())
        })?;

        Ok(flatten_lines(&decode_page(&body)))
    }
}

/// Decode a page body as UTF-8 when valid, otherwise as ISO-8859-1.
pub fn decode_page(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        // Latin-1 code points map one to one onto the first 256 chars
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Remove every carriage return and line feed.
pub fn flatten_lines(text: &str) -> String {
    text.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_appends_raw_ticker() {
        let client = FundamentusClient::new();
        assert_eq!(
            client.page_url("PETR4"),
            "http://www.fundamentus.com.br/detalhes.php?papel=PETR4"
        );
        assert_eq!(
            client.page_url("A&B"),
            "http://www.fundamentus.com.br/detalhes.php?papel=A&B"
        );
    }

    #[test]
    fn test_decode_page_utf8() {
        assert_eq!(decode_page("Cotação".as_bytes()), "Cotação");
    }

    #[test]
    fn test_decode_page_latin1() {
        let bytes = b"Cota\xe7\xe3o";
        assert_eq!(decode_page(bytes), "Cotação");
    }

    #[test]
    fn test_flatten_lines() {
        assert_eq!(
            flatten_lines("<span\r\nclass=\"txt\">LPA</span>\n"),
            "<spanclass=\"txt\">LPA</span>"
        );
    }
}
