//! Integration tests for the Pastelería storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pasteleria-integration-tests
//! ```
//!
//! Each test starts the full storefront router, middleware included, on an
//! ephemeral local port and talks to it over HTTP. [`TestClient`] keeps
//! cookies the way a browser would, so consecutive requests share a session.

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;

use pasteleria_storefront::catalog::Catalog;
use pasteleria_storefront::config::StorefrontConfig;
use pasteleria_storefront::state::AppState;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode, redirect};
use tokio::net::TcpListener;

/// Menu used by the cart scenarios.
pub const SCENARIO_CATALOG: &str = r#"[
    {"name": "Cake", "price": "25.00", "category": "Tortas"},
    {"name": "Pie", "price": "15.00", "category": "Postres"},
    {"name": "Tarta", "price": "10.00", "category": "Postres"}
]"#;

/// A response with its body read into a string.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Value of a header, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A browser-like client for one running storefront.
pub struct TestClient {
    addr: SocketAddr,
    http: Client,
}

impl TestClient {
    /// Serve the bundled menu with default configuration.
    pub async fn new() -> Self {
        let state = AppState::new(test_config()).expect("bundled catalog loads");
        Self::serve(state).await
    }

    /// Serve a menu given as JSON.
    pub async fn with_catalog(json: &str) -> Self {
        let catalog = Catalog::from_json(json).expect("test catalog parses");
        Self::serve(AppState::with_catalog(test_config(), catalog)).await
    }

    async fn serve(state: AppState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("listener address");
        let app = pasteleria_storefront::app(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server runs");
        });

        Self {
            addr,
            http: browser(),
        }
    }

    /// Another visitor on the same server, with an empty cookie jar.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            addr: self.addr,
            http: browser(),
        }
    }

    /// Send a GET request. Redirects are returned, not followed.
    pub async fn get(&self, path: &str) -> TestResponse {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .expect("request reaches server");
        read(response).await
    }

    /// Send a GET request with extra headers.
    pub async fn get_with(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut request = self.http.get(self.url(path));
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        read(request.send().await.expect("request reaches server")).await
    }

    /// POST a form naming one product, the way the cart controls do.
    pub async fn post_item(&self, path: &str, name: &str) -> TestResponse {
        let response = self
            .http
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(&[("name", name)])
            .send()
            .await
            .expect("request reaches server");
        read(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

async fn read(response: reqwest::Response) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await.expect("body reads");
    TestResponse {
        status,
        headers,
        body,
    }
}

fn test_config() -> StorefrontConfig {
    StorefrontConfig::from_lookup(|_| None).expect("default configuration is valid")
}
