use async_trait::async_trait;
use reqwest::Client;

use crate::error::ScrapeError;

/// Retrieves the raw body of a listing page.
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, ScrapeError>;
}

/// Fetches listings over HTTP with a shared client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListingFetcher for HttpFetcher {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, ScrapeError> {
        let transport = |source| ScrapeError::Transport {
            uri: uri.to_owned(),
            source,
        };

        let response = self.client.get(uri).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                uri: uri.to_owned(),
                status,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn returns_listing_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a.txt\nb.txt\n"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(Client::new());
        let body = fetcher
            .fetch(&format!("{}/files", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(body, b"a.txt\nb.txt\n");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("a.txt"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(Client::new());
        let err = fetcher.fetch(&mock_server.uri()).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let fetcher = HttpFetcher::new(Client::new());
        let err = fetcher.fetch("http://127.0.0.1:1/listing").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Transport { .. }));
    }
}
