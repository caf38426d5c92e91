//! Ephemeral SQLite connection
//!
//! The store lives in memory on a single connection: everything written to it
//! is gone once the connection is closed or dropped.

use crate::error::Result;
use sqlx::{Connection, SqliteConnection};
use tracing::{debug, warn};

/// Connection string for a private in-memory database
pub const EPHEMERAL_URL: &str = "sqlite::memory:";

/// Open a fresh in-memory database
pub async fn open_ephemeral() -> Result<SqliteConnection> {
    let conn = SqliteConnection::connect(EPHEMERAL_URL).await?;
    debug!("Opened ephemeral database at {}", EPHEMERAL_URL);
    Ok(conn)
}

/// Close the connection, discarding its contents.
///
/// A failed close is logged only; the data is unreachable either way.
pub async fn close(conn: SqliteConnection) {
    match conn.close().await {
        Ok(()) => debug!("Closed ephemeral database"),
        Err(e) => warn!("Ephemeral database did not close cleanly: {}", e),
    }
}
