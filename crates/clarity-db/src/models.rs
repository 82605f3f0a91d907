//! Database row types. These map directly to SQLite rows.
//! Distinct from clarity-types models to keep the DB layer independent.

use anyhow::{Result, anyhow};
use chrono::DateTime;

use clarity_types::models::{Channel, Message};

pub struct ChannelRow {
    pub id: String,
    pub name: String,
}

pub struct MessageRow {
    pub id: i64,
    pub channel: String,
    pub user: String,
    pub text: String,
    pub timestamp_ms: i64,
    pub pinned: bool,
}

impl From<ChannelRow> for Channel {
    fn from(row: ChannelRow) -> Self {
        Channel {
            id: row.id,
            name: row.name,
        }
    }
}

impl TryFrom<MessageRow> for Message {
    type Error = anyhow::Error;

    fn try_from(row: MessageRow) -> Result<Self> {
        let timestamp = DateTime::from_timestamp_millis(row.timestamp_ms)
            .ok_or_else(|| anyhow!("Corrupt timestamp {} on message {}", row.timestamp_ms, row.id))?;

        Ok(Message {
            id: row.id,
            channel: row.channel,
            user: row.user,
            text: row.text,
            timestamp,
            pinned: row.pinned,
        })
    }
}
