//! Render Adapter
//!
//! The session controller is display-agnostic: every dispatched event goes
//! through [`RenderSink`]. The demo binary plugs in [`TerminalRenderer`];
//! tests plug in a recorder.

use chrono::{DateTime, Utc};

use crate::protocol::{ChatMessage, PresenceChange};

/// Where dispatched events land
pub trait RenderSink: Send + 'static {
    /// Append a chat message to the view
    fn render_message(&self, message: &ChatMessage);

    /// Update the typing indicator for a participant
    fn render_typing(&self, user: &str, is_typing: bool);

    /// Update the presence list
    fn render_presence(&self, change: &PresenceChange);

    /// Surface a server-side error notification
    fn show_error(&self, message: &str);
}

/// Prints chat activity to stdout
#[derive(Debug, Clone, Default)]
pub struct TerminalRenderer;

impl RenderSink for TerminalRenderer {
    fn render_message(&self, message: &ChatMessage) {
        let badge = if message.author.is_owner { " [owner]" } else { "" };
        println!(
            "[{}] {}{}: {}",
            relative_timestamp(message.created_at, Utc::now()),
            message.author.username,
            badge,
            message.content
        );
        for attachment in &message.attachments {
            println!("        attachment: {} ({})", attachment.name, attachment.url);
        }
    }

    fn render_typing(&self, user: &str, is_typing: bool) {
        if is_typing {
            println!("-- {} is typing...", user);
        }
    }

    fn render_presence(&self, change: &PresenceChange) {
        if change.joined {
            println!("-- {} joined", change.user);
        } else {
            println!("-- {} left", change.user);
        }
    }

    fn show_error(&self, message: &str) {
        eprintln!("!! {}", message);
    }
}

/// Compact relative timestamp: "now", "5m ago", "3h ago", then the date
pub fn relative_timestamp(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();
    if minutes < 1 {
        "now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_relative_timestamp_now() {
        assert_eq!(relative_timestamp(at(12, 0), at(12, 0)), "now");
    }

    #[test]
    fn test_relative_timestamp_minutes() {
        assert_eq!(relative_timestamp(at(12, 0), at(12, 5)), "5m ago");
        assert_eq!(relative_timestamp(at(12, 0), at(12, 59)), "59m ago");
    }

    #[test]
    fn test_relative_timestamp_hours() {
        assert_eq!(relative_timestamp(at(9, 0), at(12, 0)), "3h ago");
    }

    #[test]
    fn test_relative_timestamp_date() {
        let old = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_timestamp(old, at(12, 0)), "2024-04-01");
    }
}
