use anyhow::Result;
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub tripay: TripayConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TripayConfig {
    pub api_key: Secret<String>,
    pub private_key: Secret<String>,
    pub merchant_code: String,
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("TRIPAY_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("TRIPAY_SERVICE_PORT")
            .unwrap_or_else(|_| "3007".to_string())
            .parse()?;

        // Credentials may be absent; the service still boots and the affected
        // endpoints answer configuration errors per request.
        let api_key = env::var("TRIPAY_API_KEY").unwrap_or_default();
        let private_key = env::var("TRIPAY_PRIVATE_KEY").unwrap_or_default();
        let merchant_code = env::var("TRIPAY_MERCHANT_CODE").unwrap_or_default();

        let api_base_url = env::var("TRIPAY_API_BASE_URL")
            .unwrap_or_else(|_| "https://tripay.co.id/api-sandbox".to_string());

        Ok(Self {
            server: ServerConfig { host, port },
            tripay: TripayConfig {
                api_key: Secret::new(api_key),
                private_key: Secret::new(private_key),
                merchant_code,
                api_base_url,
            },
            service_name: "tripay-service".to_string(),
        })
    }
}
