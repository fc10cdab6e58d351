//! Clock service implementation
//!
//! Attendance timestamps come from this service rather than raw system time.
//! When the school configuration selects the `ntp` time source, an SNTP query
//! establishes an offset against the configured server; the offset is cached
//! and refreshed after a TTL. When NTP is unreachable (or another source is
//! configured) the service falls back to plain server time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::net::UdpSocket;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::settings::Settings;
use crate::utils::errors::{OpenAttendanceError, Result};

/// Seconds between the NTP epoch (1900) and the Unix epoch (1970)
const NTP_UNIX_EPOCH_DELTA: u64 = 2_208_988_800;
const NTP_PORT: u16 = 123;

#[derive(Debug, Clone, Copy)]
struct CachedOffset {
    offset_ms: i64,
    fetched_at: DateTime<Utc>,
}

/// Clock service with a cached NTP-derived offset
#[derive(Debug, Clone)]
pub struct ClockService {
    settings: Settings,
    cache: Arc<RwLock<Option<CachedOffset>>>,
}

impl ClockService {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Current server time corrected by the cached NTP offset and the
    /// configured timezone offset (in minutes).
    ///
    /// `time_source` and `ntp_server` come from the school configuration row;
    /// failures never propagate, the clock degrades to system time.
    pub async fn now(&self, time_source: &str, ntp_server: &str, time_zone_offset: i32) -> DateTime<Utc> {
        let mut now = Utc::now();

        if time_source == "ntp" {
            match self.offset_ms(ntp_server).await {
                Ok(offset_ms) => {
                    now += chrono::Duration::milliseconds(offset_ms);
                }
                Err(e) => {
                    warn!(server = ntp_server, error = %e, "NTP offset unavailable, using server time");
                }
            }
        }

        now + chrono::Duration::minutes(time_zone_offset as i64)
    }

    /// Cached offset in milliseconds, refreshed when stale
    async fn offset_ms(&self, ntp_server: &str) -> Result<i64> {
        let ttl = chrono::Duration::seconds(self.settings.clock.offset_ttl_seconds as i64);

        if let Some(cached) = *self.cache.read().await {
            if Utc::now() - cached.fetched_at < ttl {
                return Ok(cached.offset_ms);
            }
        }

        let offset_ms = self.query_ntp(ntp_server).await?;
        *self.cache.write().await = Some(CachedOffset {
            offset_ms,
            fetched_at: Utc::now(),
        });
        debug!(server = ntp_server, offset_ms = offset_ms, "NTP offset refreshed");
        Ok(offset_ms)
    }

    /// Single SNTP exchange: send a mode-3 client packet, read the server's
    /// transmit timestamp, return the delta against local time.
    async fn query_ntp(&self, ntp_server: &str) -> Result<i64> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect((ntp_server, NTP_PORT)).await?;

        // LI = 0, VN = 4, Mode = 3 (client)
        let mut packet = [0u8; 48];
        packet[0] = 0b0010_0011;

        let timeout = Duration::from_secs(self.settings.clock.ntp_timeout_seconds);
        socket.send(&packet).await?;
        let received = tokio::time::timeout(timeout, socket.recv(&mut packet))
            .await
            .map_err(|_| OpenAttendanceError::ServiceUnavailable("NTP query timed out".to_string()))??;

        if received < 48 {
            return Err(OpenAttendanceError::ServiceUnavailable(
                "short NTP response".to_string(),
            ));
        }

        let server_time = parse_transmit_timestamp(&packet)?;
        Ok((server_time - Utc::now()).num_milliseconds())
    }

    /// Drop the cached offset so the next call re-queries
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}

/// Decode the transmit timestamp (bytes 40..48) of an NTP packet
fn parse_transmit_timestamp(packet: &[u8; 48]) -> Result<DateTime<Utc>> {
    let seconds = u32::from_be_bytes([packet[40], packet[41], packet[42], packet[43]]) as u64;
    let fraction = u32::from_be_bytes([packet[44], packet[45], packet[46], packet[47]]) as u64;

    if seconds < NTP_UNIX_EPOCH_DELTA {
        return Err(OpenAttendanceError::ServiceUnavailable(
            "invalid NTP timestamp".to_string(),
        ));
    }

    let unix_seconds = (seconds - NTP_UNIX_EPOCH_DELTA) as i64;
    let nanos = (fraction * 1_000_000_000 / (1u64 << 32)) as u32;

    Utc.timestamp_opt(unix_seconds, nanos)
        .single()
        .ok_or_else(|| OpenAttendanceError::ServiceUnavailable("invalid NTP timestamp".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transmit_timestamp() {
        let mut packet = [0u8; 48];
        // 2024-01-01T00:00:00Z in NTP seconds
        let ntp_seconds: u32 = (1_704_067_200u64 + NTP_UNIX_EPOCH_DELTA) as u32;
        packet[40..44].copy_from_slice(&ntp_seconds.to_be_bytes());

        let parsed = parse_transmit_timestamp(&packet).unwrap();
        assert_eq!(parsed.timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_pre_epoch_timestamp_rejected() {
        let packet = [0u8; 48];
        assert!(parse_transmit_timestamp(&packet).is_err());
    }

    #[tokio::test]
    async fn test_non_ntp_source_uses_server_time() {
        let service = ClockService::new(Settings::default());
        let before = Utc::now();
        let now = service.now("server", "pool.ntp.org", 0).await;
        assert!(now >= before);
        assert!(now - before < chrono::Duration::seconds(5));
    }

    #[tokio::test]
    async fn test_time_zone_offset_applied() {
        let service = ClockService::new(Settings::default());
        let utc = service.now("server", "pool.ntp.org", 0).await;
        let shifted = service.now("server", "pool.ntp.org", 480).await;
        let delta = shifted - utc;
        assert!(delta >= chrono::Duration::minutes(479));
        assert!(delta <= chrono::Duration::minutes(481));
    }
}
