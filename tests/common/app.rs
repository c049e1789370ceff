//! Test application fixture
//!
//! Runs the real router over a real HTTP port so WebSocket upgrades work.

use std::time::Duration;

use axum_test::TestServer;
use tapspot::backend::realtime::Hub;
use tapspot::backend::server::{build_app, AppState, ServerConfig};

use super::database::create_test_pool;

/// Configuration used by every test: cheap hashing, a fixed secret
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.auth.bcrypt_cost = 4;
    config
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: ServerConfig) -> Self {
        let pool = create_test_pool().await;
        let (app, state) = build_app(pool, config);

        let server = TestServer::builder()
            .http_transport()
            .build(app)
            .expect("Failed to start test server");

        Self { server, state }
    }

    pub fn hub(&self) -> &Hub {
        &self.state.hub
    }
}

/// Poll the hub until `expected` users are online, panicking after two seconds
pub async fn wait_for_online(hub: &Hub, expected: usize) {
    for _ in 0..200 {
        if hub.online_count().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "Expected {} online users, found {}",
        expected,
        hub.online_count().await
    );
}
