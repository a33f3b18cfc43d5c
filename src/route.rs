//! Pick between a direct connection and an HTTP proxy by probing throughput.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Proxy};
use tokio::time::Instant;
use tracing::{info, warn};

const SPEED_TEST_CHUNK_SIZE: u64 = 200 * 1024; // 200KB for speed test
const WAIT_LIMIT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Direct,
    Proxy(String),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Direct => f.write_str("direct connection"),
            Route::Proxy(url) => write!(f, "proxy {url}"),
        }
    }
}

impl Route {
    /// Client for the actual transfers. No timeout: a stalled host blocks.
    pub fn client(&self) -> Result<Client> {
        let builder = Client::builder();
        let builder = match self {
            Route::Direct => builder,
            Route::Proxy(url) => builder.proxy(Proxy::all(url).context("Invalid proxy URL")?),
        };
        builder.build().context("Failed to build HTTP client")
    }

    fn probe_client(&self) -> Result<Client> {
        let builder = Client::builder().timeout(WAIT_LIMIT);
        let builder = match self {
            Route::Direct => builder,
            Route::Proxy(url) => builder.proxy(Proxy::all(url).context("Invalid proxy URL")?),
        };
        builder.build().context("Failed to build probe client")
    }
}

// Helper function for speed calculation
fn calculate_speed_mbps(bytes_len: f64, duration_secs: f64) -> f64 {
    if duration_secs == 0.0 {
        return 0.0;
    }
    // Speed in MB/s
    (bytes_len / 1024.0 / 1024.0) / duration_secs
}

async fn test_speed(client: &Client, url: &str) -> Result<f64> {
    let start = Instant::now();
    let response = client
        .get(url)
        .header("Range", format!("bytes=0-{}", SPEED_TEST_CHUNK_SIZE - 1))
        .send()
        .await
        .context("Failed to send request for speed test")?
        .error_for_status()
        .context("Speed test request was rejected")?;

    let bytes = response
        .bytes()
        .await
        .context("Failed to read response bytes")?;
    let duration_secs = start.elapsed().as_secs_f64();

    Ok(calculate_speed_mbps(bytes.len() as f64, duration_secs))
}

/// Probes `url` directly and through `proxy`; the proxy wins only if strictly faster.
pub async fn choose(url: &str, proxy: &str) -> Result<Route> {
    info!("Testing speed... wait...");

    let proxy = Route::Proxy(proxy.to_owned());
    let direct_speed = test_speed(&Route::Direct.probe_client()?, url)
        .await
        .unwrap_or_else(|e| {
            warn!("Direct test failed: {e:#}");
            0.0
        });
    let proxy_speed = test_speed(&proxy.probe_client()?, url)
        .await
        .unwrap_or_else(|e| {
            warn!("Proxy test failed: {e:#}");
            0.0
        });

    info!("[Direct: {direct_speed:.2} MB/s] VS [Proxy: {proxy_speed:.2} MB/s]");

    if direct_speed <= 0.0 && proxy_speed <= 0.0 {
        anyhow::bail!("Both direct and proxy speed tests failed or yielded no speed.");
    }

    Ok(if proxy_speed > direct_speed {
        proxy
    } else {
        Route::Direct
    })
}

/// Route to use for a run: direct without a proxy, otherwise whichever probes faster.
/// Falls back to the proxy when neither probe gets through.
pub async fn resolve(url: &str, proxy: Option<&str>) -> Result<Route> {
    let Some(proxy) = proxy else {
        return Ok(Route::Direct);
    };
    let route = match choose(url, proxy).await {
        Ok(route) => route,
        Err(e) => {
            warn!("Speed test error: {e}. Defaulting to proxy download.");
            Route::Proxy(proxy.to_owned())
        }
    };
    info!("Will use {route}");
    Ok(route)
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const DELTA: f64 = 1e-6; // A small tolerance for floating-point comparisons

    #[test]
    fn test_speed_calculations() {
        // 1MB in 1s = 1.0 MB/s
        assert!((calculate_speed_mbps(1024.0 * 1024.0, 1.0) - 1.0).abs() < DELTA);

        // 0 bytes in 1s = 0.0 MB/s
        assert!((calculate_speed_mbps(0.0, 1.0) - 0.0).abs() < DELTA);

        // 1MB in 0.5s = 2.0 MB/s
        assert!((calculate_speed_mbps(1024.0 * 1024.0, 0.5) - 2.0).abs() < DELTA);

        // 1MB in 0s = 0.0 MB/s (handles division by zero)
        assert!((calculate_speed_mbps(1024.0 * 1024.0, 0.0) - 0.0).abs() < DELTA);

        // 2.5MB in 2.0s = 1.25 MB/s
        assert!((calculate_speed_mbps(2.5 * 1024.0 * 1024.0, 2.0) - 1.25).abs() < DELTA);
    }

    #[tokio::test]
    async fn no_proxy_means_direct() {
        let route = resolve("http://127.0.0.1:1/never-probed", None).await.unwrap();
        assert_eq!(route, Route::Direct);
    }

    #[tokio::test]
    async fn dead_proxy_loses_to_working_direct_route() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("Range", "bytes=0-204799"))
            .respond_with(ResponseTemplate::new(206).set_body_bytes(vec![7u8; 4096]))
            .mount(&mock_server)
            .await;

        let route = resolve(&mock_server.uri(), Some("http://127.0.0.1:1"))
            .await
            .unwrap();
        assert_eq!(route, Route::Direct);
    }

    #[tokio::test]
    async fn falls_back_to_proxy_when_both_probes_fail() {
        let proxy = "http://127.0.0.1:1";
        let route = resolve("http://127.0.0.1:1/file", Some(proxy)).await.unwrap();
        assert_eq!(route, Route::Proxy(proxy.to_owned()));
    }

    #[test]
    fn builds_clients_for_both_routes() {
        assert!(Route::Direct.client().is_ok());
        assert!(Route::Proxy("http://127.0.0.1:3128".into()).client().is_ok());
    }
}
