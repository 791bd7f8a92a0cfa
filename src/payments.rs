use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;

/// Payment backend selected once at startup. Running without a processor is
/// a first-class mode: orders settle immediately with a simulated payment.
#[derive(Clone)]
pub enum PaymentBackend {
    NoProcessor,
    Hosted(HostedProcessor),
}

impl PaymentBackend {
    pub fn from_config(config: &AppConfig) -> Self {
        match &config.payment {
            Some(provider) => PaymentBackend::Hosted(HostedProcessor::new(
                &provider.api_url,
                &provider.secret_key,
                &config.checkout_success_url,
                &config.checkout_cancel_url,
            )),
            None => PaymentBackend::NoProcessor,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, PaymentBackend::Hosted(_))
    }
}

/// Client for the hosted payment provider: one call opens a redirect session,
/// the outcome comes back later on the webhook.
#[derive(Clone)]
pub struct HostedProcessor {
    client: reqwest::Client,
    api_url: String,
    secret_key: String,
    success_url: String,
    cancel_url: String,
}

#[derive(Debug)]
pub struct HostedSession {
    pub url: String,
}

#[derive(Serialize)]
struct HostedSessionBody<'a> {
    amount: i64,
    currency: &'a str,
    success_url: &'a str,
    cancel_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<SessionMetadata>,
}

#[derive(Serialize)]
struct SessionMetadata {
    order_id: Uuid,
}

#[derive(Deserialize)]
struct HostedSessionResponse {
    url: String,
}

impl HostedProcessor {
    pub fn new(api_url: &str, secret_key: &str, success_url: &str, cancel_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
            success_url: success_url.to_string(),
            cancel_url: cancel_url.to_string(),
        }
    }

    pub async fn create_session(
        &self,
        amount: i64,
        currency: &str,
        order_id: Option<Uuid>,
    ) -> anyhow::Result<HostedSession> {
        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_url))
            .bearer_auth(&self.secret_key)
            .json(&HostedSessionBody {
                amount,
                currency,
                success_url: &self.success_url,
                cancel_url: &self.cancel_url,
                metadata: order_id.map(|order_id| SessionMetadata { order_id }),
            })
            .send()
            .await?
            .error_for_status()?;

        let session: HostedSessionResponse = response.json().await?;
        Ok(HostedSession { url: session.url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaymentProviderConfig;

    fn base_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            checkout_success_url: "http://localhost:3000/checkout/success".to_string(),
            checkout_cancel_url: "http://localhost:3000/checkout/cancel".to_string(),
            payment: None,
        }
    }

    #[test]
    fn backend_is_simulated_without_provider_config() {
        let backend = PaymentBackend::from_config(&base_config());
        assert!(!backend.is_configured());
    }

    #[test]
    fn backend_is_hosted_with_provider_config() {
        let mut config = base_config();
        config.payment = Some(PaymentProviderConfig {
            api_url: "https://pay.example.com/".to_string(),
            secret_key: "sk_live_abc".to_string(),
        });
        let backend = PaymentBackend::from_config(&config);
        assert!(backend.is_configured());
    }
}
