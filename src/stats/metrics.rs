//! Statistics for live streams

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of one live stream
///
/// Serializes as `{"name", "url", "clients", "created"}` for status pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamStatistics {
    /// Stream name
    pub name: String,
    /// Playback URL, filled in by whatever layer exposes the statistics
    pub url: String,
    /// Currently attached subscribers
    pub clients: usize,
    /// When the stream was created
    pub created: DateTime<Utc>,
}

impl StreamStatistics {
    pub fn new(name: String, clients: usize, created: DateTime<Utc>) -> Self {
        Self {
            name,
            url: String::new(),
            clients,
            created,
        }
    }

    /// Attach a playback URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Time since the stream was created
    pub fn age(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.created)
    }
}

/// Relay-wide totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelaySummary {
    /// Live streams
    pub streams: usize,
    /// Subscribers across all streams
    pub clients: usize,
}

impl RelaySummary {
    pub fn from_statistics(stats: &[StreamStatistics]) -> Self {
        Self {
            streams: stats.len(),
            clients: stats.iter().map(|s| s.clients).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_stream_statistics_new() {
        let created = Utc::now();
        let stats = StreamStatistics::new("live".to_string(), 3, created);

        assert_eq!(stats.name, "live");
        assert!(stats.url.is_empty());
        assert_eq!(stats.clients, 3);
        assert_eq!(stats.created, created);
    }

    #[test]
    fn test_stream_statistics_json_shape() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let stats = StreamStatistics::new("live".to_string(), 2, created)
            .with_url("srt://relay:1337?streamid=play/live");

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["name"], "live");
        assert_eq!(json["url"], "srt://relay:1337?streamid=play/live");
        assert_eq!(json["clients"], 2);
        assert_eq!(json["created"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_stream_statistics_age() {
        let created = Utc::now() - chrono::Duration::seconds(30);
        let stats = StreamStatistics::new("live".to_string(), 0, created);

        assert!(stats.age() >= chrono::Duration::seconds(30));
    }

    #[test]
    fn test_relay_summary() {
        let now = Utc::now();
        let stats = vec![
            StreamStatistics::new("a".to_string(), 2, now),
            StreamStatistics::new("b".to_string(), 5, now),
        ];

        let summary = RelaySummary::from_statistics(&stats);
        assert_eq!(summary.streams, 2);
        assert_eq!(summary.clients, 7);
    }

    #[test]
    fn test_relay_summary_empty() {
        assert_eq!(RelaySummary::from_statistics(&[]), RelaySummary::default());
    }
}
