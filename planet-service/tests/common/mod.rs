#![allow(dead_code)]

use planet_service::config::{MongoConfig, PlanetConfig, StoreBackend, DEFAULT_MONGO_URI};
use planet_service::models::solar_system;
use planet_service::services::{InMemoryPlanetStore, PlanetStore};
use planet_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::path::PathBuf;
use std::sync::Arc;

pub const TEST_ENVIRONMENT: &str = "test";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryPlanetStore>,
    client: reqwest::Client,
}

pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

pub fn test_config(static_dir: PathBuf) -> PlanetConfig {
    PlanetConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: "debug".to_string(),
        },
        mongodb: MongoConfig {
            uri: std::env::var("TEST_MONGO_URI").unwrap_or_else(|_| DEFAULT_MONGO_URI.to_string()),
            database: format!("planet_test_{}", uuid::Uuid::new_v4()),
        },
        store: StoreBackend::Memory,
        environment: TEST_ENVIRONMENT.to_string(),
        autostart: false,
        static_dir,
        otlp_endpoint: None,
    }
}

impl TestApp {
    /// Serve the full catalog from an in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with(static_dir()).await
    }

    pub async fn spawn_with(static_dir: PathBuf) -> Self {
        let store = Arc::new(InMemoryPlanetStore::with_planets(solar_system()));
        let shared: Arc<dyn PlanetStore> = store.clone();

        let app = Application::build_with_store(test_config(static_dir), shared)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let live_url = format!("{}/live", address);
        for _ in 0..50 {
            if client.get(&live_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_planet(&self, payload: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/planet", self.address))
            .json(payload)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
