use catalog::{MarketTransaction, Transaction};
use foundation::GeoPoint;
use foundation::math::haversine_km;
use serde::Serialize;

use crate::symbology::transaction_color;

pub const MIN_ALTITUDE: f64 = 0.5;
pub const MAX_ALTITUDE: f64 = 2.0;

/// Render parameters for one transaction arc.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionArc {
    pub id: String,
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    pub color: String,
    pub altitude: f64,
}

/// Grows with great-circle distance in km, capped at [`MAX_ALTITUDE`].
pub fn arc_altitude(start: GeoPoint, end: GeoPoint) -> f64 {
    (MIN_ALTITUDE + haversine_km(start, end) * 0.1).min(MAX_ALTITUDE)
}

impl TransactionArc {
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            start_lat: tx.source.lat,
            start_lng: tx.source.lng,
            end_lat: tx.destination.lat,
            end_lng: tx.destination.lng,
            color: transaction_color(tx.amount),
            altitude: arc_altitude(tx.source, tx.destination),
        }
    }

    /// `None` when either endpoint is not a displayable position.
    pub fn from_market(tx: &MarketTransaction) -> Option<Self> {
        let (start, end) = (tx.start()?, tx.end()?);
        Some(Self {
            id: tx.id.clone(),
            start_lat: start.lat,
            start_lng: start.lng,
            end_lat: end.lat,
            end_lng: end.lng,
            color: transaction_color(tx.value),
            altitude: arc_altitude(start, end),
        })
    }

    pub fn start(&self) -> GeoPoint {
        GeoPoint {
            lat: self.start_lat,
            lng: self.start_lng,
        }
    }

    pub fn end(&self) -> GeoPoint {
        GeoPoint {
            lat: self.end_lat,
            lng: self.end_lng,
        }
    }
}
