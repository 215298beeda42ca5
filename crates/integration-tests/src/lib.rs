//! End-to-end tests for the Toolshop storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p toolshop-integration-tests
//! ```
//!
//! Each test starts its own storefront on an ephemeral port with
//! [`TestServer::spawn`] and talks to it over HTTP with a cookie-keeping
//! client, so every test gets its own session and cart.
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_storefront_health() {
//!     let server = TestServer::spawn().await;
//!     let resp = server.client.get(server.url("/health")).send().await.unwrap();
//!     assert_eq!(resp.status(), 200);
//! }
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::Client;
use toolshop_storefront::config::StorefrontConfig;
use toolshop_storefront::{AppState, app};

/// A storefront running in the background of the current test runtime.
pub struct TestServer {
    pub addr: SocketAddr,
    /// Client with a cookie store, standing in for one browser.
    pub client: Client,
}

impl TestServer {
    /// Start a storefront with the built-in catalog on `127.0.0.1:0`.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn() -> Self {
        let config = StorefrontConfig {
            port: 0,
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static"),
            ..StorefrontConfig::default()
        };
        let state = AppState::new(config).expect("Failed to load catalog");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        tokio::spawn(async move {
            axum::serve(listener, app(state))
                .await
                .expect("Test server failed");
        });

        Self {
            addr,
            client: Self::new_client(),
        }
    }

    /// A fresh client with its own (empty) cookie jar.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn new_client() -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// POST a form as HTMX would, returning the response.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn htmx_post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .expect("Failed to send HTMX request")
    }

    /// GET a page and return its body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the status is not 2xx.
    pub async fn page(&self, path: &str) -> String {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        assert!(resp.status().is_success(), "GET {path}: {}", resp.status());
        resp.text().await.expect("Failed to read response")
    }
}
