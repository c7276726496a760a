//! Booking flow: listing creation through a payment intent, then
//! client-side confirmation.

use std::sync::Arc;

use catalog::{BoxFuture, SystemAlert, VoiceDataListing};
use parking_lot::Mutex;
use runtime::Channel;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::client::ApiClient;
use crate::error::{BookingError, ClientError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRequest {
    /// Minor currency units.
    pub amount: u64,
    pub listing_id: String,
}

/// Fields may be missing from a misbehaving server; both are checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
}

pub trait PaymentIntents: Send + Sync {
    fn create_payment_intent<'a>(
        &'a self,
        request: &'a PaymentIntentRequest,
    ) -> BoxFuture<'a, Result<PaymentIntentResponse, ClientError>>;
}

impl PaymentIntents for ApiClient {
    fn create_payment_intent<'a>(
        &'a self,
        request: &'a PaymentIntentRequest,
    ) -> BoxFuture<'a, Result<PaymentIntentResponse, ClientError>> {
        Box::pin(self.post_json("create-payment-intent", request))
    }
}

/// Hosted payment confirmation, e.g. a card element.
pub trait PaymentConfirmer: Send + Sync {
    /// `Err` carries the provider's message.
    fn confirm_payment<'a>(&'a self, client_secret: &'a str) -> BoxFuture<'a, Result<(), String>>;
}

pub struct BookingFlow {
    intents: Arc<dyn PaymentIntents>,
    alerts: Channel<SystemAlert>,
    listings: Mutex<Vec<VoiceDataListing>>,
}

impl BookingFlow {
    pub fn new(intents: Arc<dyn PaymentIntents>, alerts: Channel<SystemAlert>) -> Self {
        Self {
            intents,
            alerts,
            listings: Mutex::new(Vec::new()),
        }
    }

    pub fn listings(&self) -> Vec<VoiceDataListing> {
        self.listings.lock().clone()
    }

    /// Creates a payment intent for `listing` and records the listing with
    /// its intent id. Returns the client secret.
    pub async fn create_listing(&self, mut listing: VoiceDataListing) -> Result<String, BookingError> {
        match self.request_intent(&listing).await {
            Ok((client_secret, intent_id)) => {
                info!(listing = %listing.id, intent = %intent_id, "listing created");
                listing.payment_intent_id = Some(intent_id);
                self.listings.lock().push(listing);
                self.alerts
                    .publish(SystemAlert::info("New listing created successfully"));
                Ok(client_secret)
            }
            Err(err) => {
                error!(listing = %listing.id, error = %err, "listing creation failed");
                self.alerts.publish(SystemAlert::error("Failed to create listing"));
                Err(err)
            }
        }
    }

    async fn request_intent(&self, listing: &VoiceDataListing) -> Result<(String, String), BookingError> {
        let request = PaymentIntentRequest {
            amount: listing.amount_minor_units(),
            listing_id: listing.id.clone(),
        };
        let resp = self.intents.create_payment_intent(&request).await?;
        let secret = resp
            .client_secret
            .filter(|s| !s.is_empty())
            .ok_or(BookingError::MissingField("clientSecret"))?;
        let intent = resp
            .payment_intent_id
            .filter(|s| !s.is_empty())
            .ok_or(BookingError::MissingField("paymentIntentId"))?;
        Ok((secret, intent))
    }

    /// Runs the confirmation; `on_success` fires only when it succeeds.
    pub async fn confirm<F>(
        &self,
        confirmer: &dyn PaymentConfirmer,
        client_secret: &str,
        on_success: F,
    ) -> Result<(), BookingError>
    where
        F: FnOnce(),
    {
        match confirmer.confirm_payment(client_secret).await {
            Ok(()) => {
                on_success();
                Ok(())
            }
            Err(msg) => {
                self.alerts.publish(SystemAlert::error(msg.clone()));
                Err(BookingError::Confirmation(msg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::AlertKind;
    use std::cell::Cell;

    struct FixedIntents(Result<PaymentIntentResponse, u16>, Mutex<Vec<PaymentIntentRequest>>);

    impl PaymentIntents for FixedIntents {
        fn create_payment_intent<'a>(
            &'a self,
            request: &'a PaymentIntentRequest,
        ) -> BoxFuture<'a, Result<PaymentIntentResponse, ClientError>> {
            self.1.lock().push(request.clone());
            let out = match &self.0 {
                Ok(r) => Ok(r.clone()),
                Err(status) => Err(ClientError::Status {
                    status: *status,
                    body: "{\"error\":\"card declined\"}".into(),
                }),
            };
            Box::pin(async move { out })
        }
    }

    fn listing() -> VoiceDataListing {
        VoiceDataListing {
            id: "L1".into(),
            price: 25.0,
            talent_id: "t1".into(),
            payment_intent_id: None,
        }
    }

    fn flow(result: Result<PaymentIntentResponse, u16>) -> (BookingFlow, Arc<FixedIntents>, Channel<SystemAlert>) {
        let intents = Arc::new(FixedIntents(result, Mutex::new(Vec::new())));
        let alerts = Channel::new("alerts");
        (BookingFlow::new(intents.clone(), alerts.clone()), intents, alerts)
    }

    #[tokio::test]
    async fn successful_listing_records_intent_and_alerts() {
        let (flow, intents, alerts) = flow(Ok(PaymentIntentResponse {
            client_secret: Some("cs_1".into()),
            payment_intent_id: Some("pi_1".into()),
        }));
        let mut sub = alerts.subscribe();
        assert_eq!(flow.create_listing(listing()).await.unwrap(), "cs_1");
        assert_eq!(
            intents.1.lock()[0],
            PaymentIntentRequest {
                amount: 2500,
                listing_id: "L1".into()
            }
        );
        assert_eq!(flow.listings()[0].payment_intent_id.as_deref(), Some("pi_1"));
        assert_eq!(sub.drain()[0].kind, AlertKind::Info);
    }

    #[tokio::test]
    async fn server_error_publishes_error_alert() {
        let (flow, _, alerts) = flow(Err(500));
        let mut sub = alerts.subscribe();
        assert!(flow.create_listing(listing()).await.is_err());
        assert!(flow.listings().is_empty());
        let got = sub.drain();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].kind, AlertKind::Error);
    }

    #[tokio::test]
    async fn missing_secret_is_an_error() {
        let (flow, _, _) = flow(Ok(PaymentIntentResponse {
            client_secret: None,
            payment_intent_id: Some("pi_1".into()),
        }));
        assert!(matches!(
            flow.create_listing(listing()).await,
            Err(BookingError::MissingField("clientSecret"))
        ));
    }

    struct Confirmer(Result<(), String>);

    impl PaymentConfirmer for Confirmer {
        fn confirm_payment<'a>(&'a self, _: &'a str) -> BoxFuture<'a, Result<(), String>> {
            let out = self.0.clone();
            Box::pin(async move { out })
        }
    }

    #[tokio::test]
    async fn on_success_runs_only_when_confirmed() {
        let (flow, _, _) = flow(Err(500));
        let fired = Cell::new(0);
        flow.confirm(&Confirmer(Ok(())), "cs", || fired.set(fired.get() + 1))
            .await
            .unwrap();
        assert_eq!(fired.get(), 1);

        let res = flow
            .confirm(&Confirmer(Err("card declined".into())), "cs", || {
                fired.set(fired.get() + 1)
            })
            .await;
        assert!(matches!(res, Err(BookingError::Confirmation(_))));
        assert_eq!(fired.get(), 1);
    }
}
