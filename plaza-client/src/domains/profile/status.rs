//! Status message drafting.

use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveTime, Utc};
use plaza_core::user_management::profile_rules;
use plaza_core::{ProfileError, Result};
use plaza_model::{SetStatusRequest, StatusMessage};
use std::str::FromStr;
use std::time::Duration;

use crate::infra::services::ProfileService;

/// When a status clears itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusExpiry {
    #[default]
    Never,
    ThirtyMinutes,
    OneHour,
    FourHours,
    /// Until midnight UTC.
    Today,
    /// Until the start of next Monday, UTC.
    ThisWeek,
    Custom(Duration),
}

impl StatusExpiry {
    /// Time left from `now` until the status should clear.
    pub fn remaining(self, now: DateTime<Utc>) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::ThirtyMinutes => Some(Duration::from_secs(30 * 60)),
            Self::OneHour => Some(Duration::from_secs(60 * 60)),
            Self::FourHours => Some(Duration::from_secs(4 * 60 * 60)),
            Self::Today => Some(until(now, 1)),
            Self::ThisWeek => {
                let days_left = 7 - i64::from(now.weekday().num_days_from_monday());
                Some(until(now, days_left))
            }
            Self::Custom(duration) => Some(duration),
        }
    }
}

/// Duration from `now` to midnight `days` days later.
fn until(now: DateTime<Utc>, days: i64) -> Duration {
    let target = (now.date_naive() + ChronoDuration::days(days))
        .and_time(NaiveTime::MIN)
        .and_utc();
    (target - now).to_std().unwrap_or_default()
}

impl FromStr for StatusExpiry {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        Ok(match value.as_str() {
            "" | "never" => Self::Never,
            "today" => Self::Today,
            "week" | "this-week" | "this_week" => Self::ThisWeek,
            other => {
                let duration = humantime::parse_duration(other)
                    .map_err(|err| format!("invalid expiry '{s}': {err}"))?;
                match duration.as_secs() {
                    0 => return Err(format!("invalid expiry '{s}': must be positive")),
                    1800 => Self::ThirtyMinutes,
                    3600 => Self::OneHour,
                    14400 => Self::FourHours,
                    _ => Self::Custom(duration),
                }
            }
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusDraft {
    pub text: String,
    pub emoji: Option<String>,
    pub expiry: StatusExpiry,
}

impl StatusDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        let emoji = emoji.into();
        self.emoji = (!emoji.trim().is_empty()).then(|| emoji.trim().to_string());
        self
    }

    pub fn with_expiry(mut self, expiry: StatusExpiry) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn validate(&self) -> Result<()> {
        profile_rules::status_text(self.text.trim())
    }

    pub fn to_request(&self, now: DateTime<Utc>) -> Result<SetStatusRequest> {
        self.validate()?;
        Ok(SetStatusRequest {
            text: self.text.trim().to_string(),
            emoji: self.emoji.clone(),
            expires_in_seconds: self
                .expiry
                .remaining(now)
                .map(|d| d.as_secs().max(1)),
        })
    }

    pub async fn publish(
        &self,
        service: &dyn ProfileService,
        now: DateTime<Utc>,
    ) -> Result<StatusMessage> {
        let request = self.to_request(now)?;
        service
            .set_status(request)
            .await
            .map_err(ProfileError::from)
    }
}

/// Whether `status` should no longer be shown at `now`.
pub fn is_expired(status: &StatusMessage, now: DateTime<Utc>) -> bool {
    status.is_expired_at(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn wednesday_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_presets_and_custom_durations() {
        assert_eq!("never".parse::<StatusExpiry>(), Ok(StatusExpiry::Never));
        assert_eq!("30m".parse::<StatusExpiry>(), Ok(StatusExpiry::ThirtyMinutes));
        assert_eq!("1h".parse::<StatusExpiry>(), Ok(StatusExpiry::OneHour));
        assert_eq!("4h".parse::<StatusExpiry>(), Ok(StatusExpiry::FourHours));
        assert_eq!("Today".parse::<StatusExpiry>(), Ok(StatusExpiry::Today));
        assert_eq!("this-week".parse::<StatusExpiry>(), Ok(StatusExpiry::ThisWeek));
        assert_eq!(
            "90m".parse::<StatusExpiry>(),
            Ok(StatusExpiry::Custom(Duration::from_secs(5400)))
        );
        assert!("soon".parse::<StatusExpiry>().is_err());
        assert!("0s".parse::<StatusExpiry>().is_err());
    }

    #[test]
    fn calendar_expiries_end_at_midnight() {
        let now = wednesday_noon();
        assert_eq!(
            StatusExpiry::Today.remaining(now),
            Some(Duration::from_secs(12 * 3600))
        );
        // Wednesday noon to Monday 00:00 is four and a half days.
        assert_eq!(
            StatusExpiry::ThisWeek.remaining(now),
            Some(Duration::from_secs(4 * 86400 + 12 * 3600))
        );
        assert_eq!(StatusExpiry::Never.remaining(now), None);
    }

    #[test]
    fn draft_trims_and_limits_text() {
        let draft = StatusDraft::new("  heads down  ")
            .with_emoji(" 🎧 ")
            .with_expiry(StatusExpiry::OneHour);
        let request = draft.to_request(wednesday_noon()).unwrap();
        assert_eq!(request.text, "heads down");
        assert_eq!(request.emoji.as_deref(), Some("🎧"));
        assert_eq!(request.expires_in_seconds, Some(3600));

        assert!(StatusDraft::new("   ").validate().is_err());
        assert!(StatusDraft::new("ü".repeat(140)).validate().is_ok());
        assert!(StatusDraft::new("ü".repeat(141)).validate().is_err());
    }

    #[test]
    fn expiry_is_inclusive() {
        let now = wednesday_noon();
        let status = StatusMessage {
            text: "away".into(),
            emoji: None,
            expires_at: Some(now),
        };
        assert!(is_expired(&status, now));
        assert!(!is_expired(&status, now - ChronoDuration::seconds(1)));
        let forever = StatusMessage {
            expires_at: None,
            ..status
        };
        assert!(!is_expired(&forever, now));
    }
}
