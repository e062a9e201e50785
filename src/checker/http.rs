// src/checker/http.rs
// =============================================================================
// This module wraps reqwest into the one HTTP client every task uses.
//
// Key functionality:
// - Builds one reqwest Client from fixed settings (headers, timeouts, TLS)
// - probe(): GET a reference and classify the result into an Outcome
// - Normalizes every target (DOI, bare host) before requesting it
//
// The client never returns an error to its caller: every failure becomes an
// Outcome so the worker pool only ever records categories.
// =============================================================================

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

use super::normalize::normalize_url;
use super::outcome::Outcome;

/// User agent sent when the config does not set one.
/// Some servers refuse requests without a browser-looking agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; MSIE 9.0; Windows NT 6.1; Trident/5.0)";

// Settings the client is built from
//
// This is an immutable value handed to LinkClient::new(), so tests can build
// clients with their own headers and timeouts.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_redirects: usize,
    /// Accept invalid/self-signed TLS certificates ("unverified" mode)
    pub accept_invalid_certs: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 5,
            accept_invalid_certs: true,
        }
    }
}

// HTTP client shared by all workers
//
// reqwest::Client is an Arc internally, so cloning LinkClient is cheap and
// every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct LinkClient {
    pub(crate) client: Client,
}

impl LinkClient {
    pub fn new(settings: &ClientSettings) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&settings.user_agent)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.max_redirects))
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()?;

        if settings.accept_invalid_certs {
            tracing::debug!("TLS certificate verification disabled");
        }

        Ok(Self { client })
    }

    // Checks a single target
    //
    // Sends one GET and classifies what came back:
    //   got a response -> Success / Redirect / ClientError by status code
    //   request failed -> one of the NetworkError sentinels (or Unknown)
    pub async fn probe(&self, target: &str) -> Outcome {
        let url = normalize_url(target);

        match self.client.get(&url).send().await {
            Ok(response) => Outcome::from_status(response.status().as_u16()),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "probe failed");
                Outcome::from_request_error(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::outcome::NetworkErrorKind;
    use httpmock::{Method::GET, MockServer};

    #[tokio::test]
    async fn test_probe_ok() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ok");
                then.status(200).body("fine");
            })
            .await;

        let client = LinkClient::new(&ClientSettings::default()).unwrap();
        let outcome = client.probe(&server.url("/ok")).await;

        assert_eq!(outcome, Outcome::Success(200));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_probe_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let client = LinkClient::new(&ClientSettings::default()).unwrap();
        let outcome = client.probe(&server.url("/missing")).await;

        assert_eq!(outcome, Outcome::ClientError(404));
    }

    #[tokio::test]
    async fn test_probe_sends_configured_user_agent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/agent")
                    .header("user-agent", "linkpool-test/1.0");
                then.status(204);
            })
            .await;

        let settings = ClientSettings {
            user_agent: "linkpool-test/1.0".to_string(),
            ..ClientSettings::default()
        };
        let client = LinkClient::new(&settings).unwrap();
        let outcome = client.probe(&server.url("/agent")).await;

        assert_eq!(outcome, Outcome::Success(204));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_probe_bare_host_is_normalized() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/");
                then.status(200);
            })
            .await;

        // server.address() is "127.0.0.1:port", no scheme
        let client = LinkClient::new(&ClientSettings::default()).unwrap();
        let outcome = client.probe(&server.address().to_string()).await;

        assert_eq!(outcome, Outcome::Success(200));
    }

    #[tokio::test]
    async fn test_probe_connection_refused() {
        // Bind a port, then free it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = LinkClient::new(&ClientSettings::default()).unwrap();
        let outcome = client.probe(&format!("http://127.0.0.1:{}/", port)).await;

        assert_eq!(
            outcome,
            Outcome::NetworkError(NetworkErrorKind::Connection)
        );
    }

    #[tokio::test]
    async fn test_probe_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow");
                then.status(200).delay(Duration::from_millis(500));
            })
            .await;

        let settings = ClientSettings {
            timeout: Duration::from_millis(50),
            ..ClientSettings::default()
        };
        let client = LinkClient::new(&settings).unwrap();
        let outcome = client.probe(&server.url("/slow")).await;

        assert_eq!(outcome, Outcome::NetworkError(NetworkErrorKind::Timeout));
    }

    #[tokio::test]
    async fn test_probe_redirect_loop() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/loop");
                then.status(302).header("Location", "/loop");
            })
            .await;

        let client = LinkClient::new(&ClientSettings::default()).unwrap();
        let outcome = client.probe(&server.url("/loop")).await;

        assert_eq!(outcome, Outcome::NetworkError(NetworkErrorKind::Http));
    }
}
