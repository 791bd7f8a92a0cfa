use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub checkout_success_url: String,
    pub checkout_cancel_url: String,
    pub payment: Option<PaymentProviderConfig>,
}

/// Hosted payment provider credentials. When absent the API runs in the
/// simulated-payment mode and orders settle immediately.
#[derive(Debug, Clone)]
pub struct PaymentProviderConfig {
    pub api_url: String,
    pub secret_key: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let checkout_success_url = env::var("CHECKOUT_SUCCESS_URL")
            .unwrap_or_else(|_| "http://localhost:3000/checkout/success".to_string());
        let checkout_cancel_url = env::var("CHECKOUT_CANCEL_URL")
            .unwrap_or_else(|_| "http://localhost:3000/checkout/cancel".to_string());
        let payment = payment_from_env()?;
        Ok(Self {
            database_url,
            host,
            port,
            checkout_success_url,
            checkout_cancel_url,
            payment,
        })
    }
}

fn payment_from_env() -> anyhow::Result<Option<PaymentProviderConfig>> {
    let api_url = env::var("PAYMENT_API_URL").ok().filter(|v| !v.is_empty());
    let secret_key = env::var("PAYMENT_SECRET_KEY").ok().filter(|v| !v.is_empty());
    match (api_url, secret_key) {
        (Some(api_url), Some(secret_key)) => Ok(Some(PaymentProviderConfig {
            api_url,
            secret_key,
        })),
        (None, None) => Ok(None),
        _ => anyhow::bail!("PAYMENT_API_URL and PAYMENT_SECRET_KEY must be set together"),
    }
}
