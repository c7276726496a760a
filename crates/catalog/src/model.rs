use foundation::{GeoPoint, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
}

/// A plotted voice talent as served by the catalog.
///
/// Coordinates are optional on the wire; a talent without a valid position is
/// kept in the store but never reaches a derived layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Talent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub language_id: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub accent: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sample_url: String,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, rename = "timeSlot")]
    pub time_slot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<VoiceCategory>,
}

impl Talent {
    pub fn position(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.lat, self.lng)
    }

    pub fn language_name(&self) -> Option<&str> {
        self.language.as_ref().map(|l| l.name.as_str())
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// A value transfer between two points on the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub talent_id: String,
    pub buyer_id: String,
    pub amount: f64,
    pub status: TransactionStatus,
    pub payment_intent_id: String,
    pub created_at: Timestamp,
    pub source: GeoPoint,
    pub destination: GeoPoint,
}

/// Flattened transaction view used for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTransaction {
    pub id: String,
    pub value: f64,
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    pub timestamp: Timestamp,
}

impl From<&Transaction> for MarketTransaction {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            value: tx.amount,
            start_lat: tx.source.lat,
            start_lng: tx.source.lng,
            end_lat: tx.destination.lat,
            end_lng: tx.destination.lng,
            timestamp: tx.created_at,
        }
    }
}

impl MarketTransaction {
    pub fn start(&self) -> Option<GeoPoint> {
        GeoPoint::new(self.start_lat, self.start_lng)
    }

    pub fn end(&self) -> Option<GeoPoint> {
        GeoPoint::new(self.end_lat, self.end_lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceDataListing {
    pub id: String,
    /// Major currency units; converted to minor units when paying.
    pub price: f64,
    pub talent_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
}

impl VoiceDataListing {
    pub fn amount_minor_units(&self) -> u64 {
        (self.price * 100.0).round().max(0.0) as u64
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemAlert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
}

impl SystemAlert {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAnalysis {
    pub talent_id: String,
    pub clarity: f64,
    pub emotion: String,
    pub confidence: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketUpdateKind {
    Listing,
    Transaction,
    Analytics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketUpdate {
    #[serde(rename = "type")]
    pub kind: MarketUpdateKind,
    pub data: serde_json::Value,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Notification that the backing talent collection changed.
///
/// The payload is informational only; consumers always refetch in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    #[serde(rename = "eventType")]
    pub kind: ChangeKind,
    #[serde(default)]
    pub record_id: Option<String>,
}

impl ChangeEvent {
    pub fn talents(kind: ChangeKind, record_id: Option<String>) -> Self {
        Self {
            table: "voice_talents".to_string(),
            kind,
            record_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn talent_parses_catalog_row_with_joins() {
        let raw = r#"{
            "id": "t1",
            "name": "Sarah Johnson",
            "language_id": "l1",
            "category_id": "c1",
            "hourly_rate": 150,
            "lat": 40.7128,
            "lng": -74.006,
            "pattern": "Professional",
            "timeSlot": "Morning",
            "language": {"id": "l1", "name": "English", "code": "en"}
        }"#;
        let t: Talent = serde_json::from_str(raw).unwrap();
        assert_eq!(t.language_name(), Some("English"));
        assert_eq!(t.time_slot, "Morning");
        assert_eq!(t.emotion, "");
        assert_eq!(t.position(), GeoPoint::new(40.7128, -74.006));
    }

    #[test]
    fn talent_without_coordinates_has_no_position() {
        let t: Talent = serde_json::from_str(r#"{"id":"x","name":"n","lat":12.0}"#).unwrap();
        assert!(t.position().is_none());
    }

    #[test]
    fn market_transaction_flattens_fields() {
        let tx = Transaction {
            id: "tx".into(),
            talent_id: "t1".into(),
            buyer_id: "b1".into(),
            amount: 250.0,
            status: TransactionStatus::Completed,
            payment_intent_id: "pi_1".into(),
            created_at: Timestamp(42),
            source: GeoPoint::new(1.0, 2.0).unwrap(),
            destination: GeoPoint::new(3.0, 4.0).unwrap(),
        };
        let m = MarketTransaction::from(&tx);
        assert_eq!(
            m,
            MarketTransaction {
                id: "tx".into(),
                value: 250.0,
                start_lat: 1.0,
                start_lng: 2.0,
                end_lat: 3.0,
                end_lng: 4.0,
                timestamp: Timestamp(42),
            }
        );
    }

    #[test]
    fn listing_converts_to_minor_units() {
        let l = VoiceDataListing {
            id: "l".into(),
            price: 150.0,
            talent_id: "t1".into(),
            payment_intent_id: None,
        };
        assert_eq!(l.amount_minor_units(), 15_000);
    }

    #[test]
    fn alert_serializes_with_type_tag() {
        let v = serde_json::to_value(SystemAlert::error("boom")).unwrap();
        assert_eq!(v, serde_json::json!({"type": "error", "message": "boom"}));
    }
}
