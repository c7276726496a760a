//! Payment-intent creation against the card processor.

use std::time::Duration;

use catalog::BoxFuture;
use parking_lot::Mutex;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const STRIPE_INTENTS_URL: &str = "https://api.stripe.com/v1/payment_intents";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment processor unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("payment processor rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("payment processor unavailable")]
    Unavailable,
}

/// An intent the client can confirm with its card details.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedIntent {
    pub id: String,
    pub client_secret: String,
}

pub trait PaymentGateway: Send + Sync {
    /// `amount` is in the currency's minor units.
    fn create_intent<'a>(
        &'a self,
        amount: u64,
        currency: &'a str,
        listing_id: &'a str,
    ) -> BoxFuture<'a, Result<CreatedIntent, PaymentError>>;
}

pub struct StripeGateway {
    secret_key: String,
    http: reqwest::Client,
}

impl StripeGateway {
    pub fn new(secret_key: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            secret_key: secret_key.into(),
            http: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

impl PaymentGateway for StripeGateway {
    fn create_intent<'a>(
        &'a self,
        amount: u64,
        currency: &'a str,
        listing_id: &'a str,
    ) -> BoxFuture<'a, Result<CreatedIntent, PaymentError>> {
        Box::pin(async move {
            let amount = amount.to_string();
            let form = [
                ("amount", amount.as_str()),
                ("currency", currency),
                ("metadata[listingId]", listing_id),
                ("automatic_payment_methods[enabled]", "true"),
            ];
            let resp = self
                .http
                .post(STRIPE_INTENTS_URL)
                .bearer_auth(&self.secret_key)
                .form(&form)
                .send()
                .await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(PaymentError::Rejected {
                    status: status.as_u16(),
                    body: resp.text().await.unwrap_or_default(),
                });
            }
            let intent: CreatedIntent = resp.json().await?;
            debug!(intent = %intent.id, "payment intent created");
            Ok(intent)
        })
    }
}

/// Call recorded by [`MockGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentCall {
    pub amount: u64,
    pub currency: String,
    pub listing_id: String,
}

/// Offline gateway for development and tests.
#[derive(Debug, Default)]
pub struct MockGateway {
    failing: bool,
    calls: Mutex<Vec<IntentCall>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<IntentCall> {
        self.calls.lock().clone()
    }
}

impl PaymentGateway for MockGateway {
    fn create_intent<'a>(
        &'a self,
        amount: u64,
        currency: &'a str,
        listing_id: &'a str,
    ) -> BoxFuture<'a, Result<CreatedIntent, PaymentError>> {
        Box::pin(async move {
            self.calls.lock().push(IntentCall {
                amount,
                currency: currency.to_string(),
                listing_id: listing_id.to_string(),
            });
            if self.failing {
                return Err(PaymentError::Unavailable);
            }
            let id = format!("pi_mock_{}", uuid::Uuid::new_v4().simple());
            Ok(CreatedIntent {
                client_secret: format!("{id}_secret_mock"),
                id,
            })
        })
    }
}
