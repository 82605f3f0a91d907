use crate::Database;
use crate::models::{ChannelRow, MessageRow};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use clarity_types::models::{Channel, Message};

impl Database {
    // -- Channels --

    pub fn list_channels(&self) -> Result<Vec<Channel>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM channels ORDER BY rowid")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(ChannelRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows.into_iter().map(Channel::from).collect())
        })
    }

    // -- Messages --

    /// Append a message and return it with its assigned id.
    pub fn insert_message(
        &self,
        channel: &str,
        user: &str,
        text: &str,
        pinned: bool,
        timestamp: DateTime<Utc>,
    ) -> Result<Message> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (channel, user, text, timestamp_ms, pinned) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![channel, user, text, timestamp.timestamp_millis(), pinned],
            )?;

            Message::try_from(MessageRow {
                id: conn.last_insert_rowid(),
                channel: channel.to_string(),
                user: user.to_string(),
                text: text.to_string(),
                timestamp_ms: timestamp.timestamp_millis(),
                pinned,
            })
        })
    }

    /// The latest `limit` messages, oldest first.
    pub fn recent_messages(&self, limit: u32) -> Result<Vec<Message>> {
        self.with_conn(|conn| {
            let mut messages = query_messages(
                conn,
                "SELECT id, channel, user, text, timestamp_ms, pinned
                 FROM messages
                 ORDER BY id DESC
                 LIMIT ?1",
                rusqlite::params![limit],
            )?;
            messages.reverse();
            Ok(messages)
        })
    }

    /// Every stored message in append order. This is the snapshot an ask
    /// ranks against.
    pub fn all_messages(&self) -> Result<Vec<Message>> {
        self.with_conn(|conn| {
            query_messages(
                conn,
                "SELECT id, channel, user, text, timestamp_ms, pinned
                 FROM messages
                 ORDER BY id ASC",
                rusqlite::params![],
            )
        })
    }

    pub fn message_count(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }
}

fn query_messages<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Message>> {
    let mut stmt = conn.prepare(sql)?;

    let rows = stmt
        .query_map(params, |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                channel: row.get(1)?,
                user: row.get(2)?,
                text: row.get(3)?,
                timestamp_ms: row.get(4)?,
                pinned: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(Message::try_from).collect()
}
