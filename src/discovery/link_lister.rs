//! Fetches the trip-record listing page and extracts every hyperlink target.

use crate::config::HttpConfig;
use crate::discovery::error::DiscoveryError;
use crate::retry::{send_with_retry, RequestFailure};
use log::info;
use reqwest::Client;
use scraper::{Html, Selector};

/// All `href` targets of `<a>` elements in `html`, in document order.
pub fn extract_links(html: &str) -> Result<Vec<String>, DiscoveryError> {
    let selector =
        Selector::parse("a[href]").map_err(|e| DiscoveryError::Selector(e.to_string()))?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .collect())
}

/// Fetches `page_url` and returns its hyperlink targets. Failures propagate.
///
/// Unlike file downloads, the page request has a total deadline of
/// [`HttpConfig::timeout`].
pub async fn list_links(
    client: &Client,
    page_url: &str,
    http: &HttpConfig,
) -> Result<Vec<String>, DiscoveryError> {
    let response = send_with_retry(|| client.get(page_url).timeout(http.timeout()), http)
        .await
        .map_err(|failure| match failure {
            RequestFailure::Network(e) => DiscoveryError::NetworkRequest(page_url.to_string(), e),
            RequestFailure::Status { status, source } => DiscoveryError::HttpStatus {
                url: page_url.to_string(),
                status,
                source,
            },
        })?;
    let body = response
        .text()
        .await
        .map_err(|e| DiscoveryError::Body(page_url.to_string(), e))?;
    let links = extract_links(&body)?;
    info!("Found {} links on {}", links.len(), page_url);
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{Reply, TestServer};

    #[test]
    fn test_extract_links_in_order() {
        let html = r#"
            <html><body>
              <ul>
                <li><a href=" https://d37ci6vzurychx.cloudfront.net/trip-data/yellow_tripdata_2024-01.parquet ">Yellow</a></li>
                <li><a title="no target">Nothing</a></li>
                <li><a href="/site/tlc/about/data.page">About</a></li>
              </ul>
            </body></html>"#;
        let links = extract_links(html).unwrap();
        assert_eq!(
            links,
            vec![
                "https://d37ci6vzurychx.cloudfront.net/trip-data/yellow_tripdata_2024-01.parquet",
                "/site/tlc/about/data.page",
            ]
        );
    }

    #[test]
    fn test_extract_links_empty_page() {
        assert!(extract_links("<html></html>").unwrap().is_empty());
    }

    fn test_http() -> HttpConfig {
        HttpConfig {
            timeout_secs: 5,
            read_timeout_secs: 5,
            max_retries: 2,
            base_delay_ms: 1,
        }
    }

    #[tokio::test]
    async fn test_list_links_from_server() {
        let server = TestServer::start(vec![Reply::Status(
            200,
            r#"<a href="yellow_tripdata_2020-01.parquet">Jan</a><a href="fhvhv_tripdata_2020-01.parquet">Jan</a>"#,
        )])
        .await;
        let links = list_links(&Client::new(), &server.url("tlc.page"), &test_http())
            .await
            .unwrap();
        assert_eq!(
            links,
            vec!["yellow_tripdata_2020-01.parquet", "fhvhv_tripdata_2020-01.parquet"]
        );
    }

    #[tokio::test]
    async fn test_missing_page_propagates_status() {
        let server = TestServer::start(vec![Reply::Status(404, "gone")]).await;
        let result = list_links(&Client::new(), &server.url("tlc.page"), &test_http()).await;
        assert!(matches!(
            result,
            Err(DiscoveryError::HttpStatus { status, .. }) if status == reqwest::StatusCode::NOT_FOUND
        ));
        assert_eq!(server.hits(), 1);
    }
}
