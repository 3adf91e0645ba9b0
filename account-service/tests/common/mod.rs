use std::sync::Arc;

use account_service::account::service::AccountService;
use account_service::inbound::http::router::create_router;
use account_service::repositories::InMemoryCredentialRepository;
use auth::Authenticator;
use auth::ManualClock;
use auth::TokenConfig;
use chrono::Duration;

pub const TEST_SECRET: &str = "test-secret-key-for-token-signing-at-least-32-bytes";

/// Fixed start instant of the test clock (Unix epoch milliseconds).
pub const TEST_NOW: i64 = 1_700_000_000_000;

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub clock: Arc<ManualClock>,
    pub authenticator: Arc<Authenticator>,
    pub repository: Arc<InMemoryCredentialRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let clock = Arc::new(ManualClock::new(TEST_NOW));
        let authenticator = Arc::new(Authenticator::with_clock(
            TokenConfig::new(TEST_SECRET, Duration::hours(24)),
            clock.clone(),
        ));

        let repository = Arc::new(InMemoryCredentialRepository::new());
        let account_service = Arc::new(AccountService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));

        let router = create_router(account_service, Arc::clone(&authenticator));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            clock,
            authenticator,
            repository,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Register a user and return the response body
    pub async fn register(&self, email: &str, password: &str) -> serde_json::Value {
        self.post("/api/auth/register")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response")
    }
}
