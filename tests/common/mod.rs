use secrecy::Secret;
use tripay_service::config::{Config, ServerConfig, TripayConfig};
use tripay_service::startup::Application;

pub const TEST_API_KEY: &str = "test_api_key";
pub const TEST_PRIVATE_KEY: &str = "test_private_key";
pub const TEST_MERCHANT_CODE: &str = "T001";

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Spawn the service with the gateway base URL pointed at `gateway_url`.
    pub async fn spawn(gateway_url: &str) -> Self {
        Self::spawn_with_tripay(TripayConfig {
            api_key: Secret::new(TEST_API_KEY.to_string()),
            private_key: Secret::new(TEST_PRIVATE_KEY.to_string()),
            merchant_code: TEST_MERCHANT_CODE.to_string(),
            api_base_url: gateway_url.to_string(),
        })
        .await
    }

    /// Spawn the service with no Tripay credentials set.
    pub async fn spawn_unconfigured() -> Self {
        Self::spawn_with_tripay(TripayConfig {
            api_key: Secret::new(String::new()),
            private_key: Secret::new(String::new()),
            merchant_code: String::new(),
            api_base_url: "https://tripay.co.id/api-sandbox".to_string(),
        })
        .await
    }

    async fn spawn_with_tripay(tripay: TripayConfig) -> Self {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            tripay,
            service_name: "tripay-service-test".to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
