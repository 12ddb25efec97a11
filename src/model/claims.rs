//! Local key/value cache for claims and the third-party token.

use std::path::Path;

use ahash::AHashMap;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use super::segment::Segment;
use crate::error::AppError;

const CLAIM_PREFIX: &str = "claim:";
pub const STRAVA_TOKEN_KEY: &str = "strava:token";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

#[must_use]
pub fn claim_key(segment_id: i64) -> String {
    format!("{CLAIM_PREFIX}{segment_id}")
}

pub type ClaimMap = AHashMap<i64, String>;

pub struct ClaimStore {
    conn: Connection,
}

impl ClaimStore {
    /// # Errors
    ///
    /// Will return `Err` if the file cannot be opened or the schema cannot be created
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        Self::with_connection(Connection::open(path)?)
    }

    /// # Errors
    ///
    /// Will return `Err` if sqlite cannot create the schema
    pub fn open_in_memory() -> Result<Self, AppError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, AppError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, AppError> {
        let removed = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    /// # Errors
    ///
    /// Will return `Err` if the sqlite read fails
    pub fn get_claim(&self, segment_id: i64) -> Result<Option<String>, AppError> {
        Ok(self
            .get(&claim_key(segment_id))?
            .filter(|claim| !claim.is_empty()))
    }

    /// Stores a trimmed claim. A blank claim clears the entry instead.
    /// Returns the claim that is now in effect.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the sqlite write fails
    pub fn set_claim(&self, segment_id: i64, claim: &str) -> Result<Option<String>, AppError> {
        let claim = claim.trim();
        if claim.is_empty() {
            self.clear_claim(segment_id)?;
            return Ok(None);
        }
        self.put(&claim_key(segment_id), claim)?;
        Ok(Some(claim.to_string()))
    }

    /// Returns whether an entry was removed.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the sqlite write fails
    pub fn clear_claim(&self, segment_id: i64) -> Result<bool, AppError> {
        self.delete(&claim_key(segment_id))
    }

    /// Records a local clear that the server has not seen yet. The empty entry
    /// hides the server's claim until `clear_claim` removes it.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the sqlite write fails
    pub fn mark_cleared(&self, segment_id: i64) -> Result<(), AppError> {
        self.put(&claim_key(segment_id), "")
    }

    /// Cleared-but-unsynced entries come back as empty strings.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the sqlite read fails
    pub fn all_claims(&self) -> Result<ClaimMap, AppError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM kv WHERE key LIKE 'claim:%'")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut claims = ClaimMap::default();
        for row in rows {
            let (key, value) = row?;
            match key[CLAIM_PREFIX.len()..].parse::<i64>() {
                Ok(id) => {
                    claims.insert(id, value);
                }
                Err(e) => tracing::warn!(%key, error = %e, "skipping malformed claim key"),
            }
        }
        Ok(claims)
    }

    /// # Errors
    ///
    /// Will return `Err` if the stored value is not valid json for `T`
    pub fn get_json<T>(&self, key: &str) -> Result<Option<T>, AppError>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.get(key)?
            .map(|text| serde_json::from_str(&text).map_err(AppError::from))
            .transpose()
    }

    /// # Errors
    ///
    /// Will return `Err` if serialization or the sqlite write fails
    pub fn put_json<T>(&self, key: &str, value: &T) -> Result<(), AppError>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_string(value)?;
        self.put(key, &payload)
    }

    /// # Errors
    ///
    /// Will return `Err` if the sqlite write fails
    pub fn remove(&self, key: &str) -> Result<bool, AppError> {
        self.delete(key)
    }
}

/// Cached claims win over whatever the server returned.
pub fn overlay_claims(segments: &mut [Segment], claims: &ClaimMap) {
    for segment in segments {
        if let Some(claim) = claims.get(&segment.id) {
            segment.claim = (!claim.is_empty()).then(|| claim.clone());
        }
    }
}
