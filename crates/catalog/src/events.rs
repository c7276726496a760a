use runtime::Channel;

use crate::analytics::AnalyticsResult;
use crate::model::{ChangeEvent, MarketUpdate, SystemAlert, Transaction, VoiceAnalysis};

/// The application's live channels, one per event kind.
///
/// Constructed once at start-up and handed to every component that publishes
/// or listens; cloning shares the same underlying channels.
#[derive(Debug, Clone)]
pub struct LiveChannels {
    pub transactions: Channel<Transaction>,
    pub analytics: Channel<AnalyticsResult>,
    pub alerts: Channel<SystemAlert>,
    pub voice_analysis: Channel<VoiceAnalysis>,
    pub market_updates: Channel<MarketUpdate>,
    pub remote_changes: Channel<ChangeEvent>,
}

impl LiveChannels {
    pub fn new() -> Self {
        Self {
            transactions: Channel::new("transactions"),
            analytics: Channel::new("analytics"),
            alerts: Channel::new("system_alerts"),
            voice_analysis: Channel::new("voice_analysis"),
            market_updates: Channel::new("market_updates"),
            remote_changes: Channel::new("remote_changes"),
        }
    }
}

impl Default for LiveChannels {
    fn default() -> Self {
        Self::new()
    }
}
