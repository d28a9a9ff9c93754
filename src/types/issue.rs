//! Metadata for the issue filed on behalf of a Slack message.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the issue filer needs to know about a message.
///
/// Built fresh for every pipeline run; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueMetadata {
    /// Human-readable channel name, without the leading `#`.
    pub channel: String,

    /// Slack timestamp of the message.
    pub timestamp: String,

    /// Permalink to the message; used as the issue body.
    pub url: String,

    /// When the message was posted, if the timestamp parsed.
    pub date: Option<DateTime<Utc>>,

    /// Issue title: `Update from #<channel> at <RFC-1123 date>`.
    pub title: String,
}

impl IssueMetadata {
    pub fn new(
        channel: impl Into<String>,
        timestamp: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let channel = channel.into();
        let timestamp = timestamp.into();
        let date = parse_slack_ts(&timestamp);
        let when = match date {
            Some(date) => format_rfc1123(&date),
            None => timestamp.clone(),
        };
        let title = format!("Update from #{} at {}", channel, when);

        IssueMetadata {
            channel,
            timestamp,
            url: url.into(),
            date,
            title,
        }
    }
}

/// Parses a Slack `seconds.micros` timestamp.
pub fn parse_slack_ts(ts: &str) -> Option<DateTime<Utc>> {
    let (secs, frac) = match ts.split_once('.') {
        Some((secs, frac)) => (secs, frac),
        None => (ts, ""),
    };
    let secs: i64 = secs.parse().ok()?;
    let nanos = if frac.is_empty() {
        0
    } else {
        if frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let padded = format!("{:0<9}", frac);
        padded.parse::<u32>().ok()?
    };
    DateTime::from_timestamp(secs, nanos)
}

/// Formats a date the way HTTP headers do: `Fri, 31 Dec 1999 23:59:59 GMT`.
pub fn format_rfc1123(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn title_uses_channel_and_utc_date() {
        let metadata = IssueMetadata::new(
            "handbook",
            "1360782804.083113",
            "https://18f.slack.com/archives/handbook/p1360782804083113",
        );

        assert_eq!(
            metadata.title,
            "Update from #handbook at Wed, 13 Feb 2013 19:13:24 GMT"
        );
        let expected = Utc.with_ymd_and_hms(2013, 2, 13, 19, 13, 24).unwrap()
            + chrono::Duration::microseconds(83113);
        assert_eq!(metadata.date, Some(expected));
        assert_eq!(metadata.timestamp, "1360782804.083113");
    }

    #[test]
    fn rfc1123_zero_pads_the_day() {
        let date = Utc.with_ymd_and_hms(1999, 12, 1, 3, 4, 5).unwrap();
        assert_eq!(format_rfc1123(&date), "Wed, 01 Dec 1999 03:04:05 GMT");
    }

    #[test]
    fn parse_slack_ts_accepts_whole_seconds() {
        let date = parse_slack_ts("946684799").unwrap();
        assert_eq!(format_rfc1123(&date), "Fri, 31 Dec 1999 23:59:59 GMT");
    }

    #[test]
    fn parse_slack_ts_rejects_garbage() {
        assert_eq!(parse_slack_ts(""), None);
        assert_eq!(parse_slack_ts("yesterday"), None);
        assert_eq!(parse_slack_ts("12.ab"), None);
    }

    #[test]
    fn unparseable_timestamp_is_used_verbatim_in_title() {
        let metadata = IssueMetadata::new("handbook", "not-a-ts", "https://example");
        assert_eq!(metadata.title, "Update from #handbook at not-a-ts");
        assert_eq!(metadata.date, None);
    }
}
