use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS channels (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS messages (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            channel         TEXT NOT NULL,
            user            TEXT NOT NULL,
            text            TEXT NOT NULL,
            timestamp_ms    INTEGER NOT NULL,
            pinned          INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_messages_timestamp
            ON messages(timestamp_ms);

        -- Seed the workspace channels
        INSERT OR IGNORE INTO channels (id, name) VALUES
            ('general', '#general'),
            ('propulsion', '#propulsion'),
            ('guidance', '#guidance'),
            ('ops', '#ops'),
            ('ask-org', '#ask-org-ai');
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
