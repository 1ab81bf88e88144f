//! Stored bias analyses.
//!
//! Records are written once and never updated or deleted. The unique index on
//! `normalized_url` is what keeps concurrent first-time requests from storing
//! two analyses of the same article.

use super::connection::CacheDb;
use crate::Error;
use crate::verdict::{TrustLevel, Verdict};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, OptionalExtension, Row, types::Type};

/// A persisted analysis for one canonical URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AnalysisRecord {
    pub normalized_url: String,
    pub domain: String,
    pub authors: Vec<String>,
    pub trust_level: TrustLevel,
    pub analysis_result: Verdict,
    pub api_model: String,
    pub created_at: String,
    pub updated_at: String,
}

impl AnalysisRecord {
    /// Build a new record from a fresh verdict, stamped with the current time.
    pub fn new(
        normalized_url: impl Into<String>, domain: impl Into<String>, verdict: Verdict, api_model: impl Into<String>,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            normalized_url: normalized_url.into(),
            domain: domain.into(),
            authors: verdict.authors.clone(),
            trust_level: verdict.trust_level,
            analysis_result: verdict,
            api_model: api_model.into(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

const SELECT_COLUMNS: &str = "SELECT normalized_url, domain, authors, trust_level, analysis_result, api_model,
            created_at, updated_at
     FROM bias_analyses";

fn json_column<T: serde::de::DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<AnalysisRecord> {
    Ok(AnalysisRecord {
        normalized_url: row.get(0)?,
        domain: row.get(1)?,
        authors: json_column(row, 2)?,
        trust_level: row.get(3)?,
        analysis_result: json_column(row, 4)?,
        api_model: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl CacheDb {
    /// Look up the analysis stored for a canonical key.
    ///
    /// Returns None if the URL has not been analysed yet.
    pub async fn lookup(&self, key: &str) -> Result<Option<AnalysisRecord>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<AnalysisRecord>, Error> {
                let mut stmt = conn.prepare_cached(&format!("{SELECT_COLUMNS} WHERE normalized_url = ?1"))?;
                Ok(stmt.query_row(params![key], record_from_row).optional()?)
            })
            .await
            .map_err(Error::from)
    }

    /// Store a new analysis if none exists for its key.
    ///
    /// The insert is conditional in a single statement; when another request
    /// stored the key first, nothing is written and `Error::AlreadyExists`
    /// is returned.
    pub async fn store(&self, record: &AnalysisRecord) -> Result<(), Error> {
        let record = record.clone();
        let authors = serde_json::to_string(&record.authors)
            .map_err(|e| Error::InvalidVerdict(format!("unserializable authors: {e}")))?;
        let analysis = serde_json::to_string(&record.analysis_result)
            .map_err(|e| Error::InvalidVerdict(format!("unserializable verdict: {e}")))?;

        self.conn
            .call(move |conn| -> Result<(), Error> {
                let inserted = conn.execute(
                    "INSERT INTO bias_analyses (
                        normalized_url, domain, authors, trust_level, analysis_result, api_model,
                        created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(normalized_url) DO NOTHING",
                    params![
                        &record.normalized_url,
                        &record.domain,
                        authors,
                        record.trust_level,
                        analysis,
                        &record.api_model,
                        &record.created_at,
                        &record.updated_at,
                    ],
                )?;

                if inserted == 0 {
                    return Err(Error::AlreadyExists(record.normalized_url));
                }
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Most recent analyses for a domain, newest first.
    pub async fn analyses_for_domain(&self, domain: &str, limit: usize) -> Result<Vec<AnalysisRecord>, Error> {
        let domain = domain.to_string();
        let limit = limit as i64;
        self.conn
            .call(move |conn| -> Result<Vec<AnalysisRecord>, Error> {
                let sql = format!("{SELECT_COLUMNS} WHERE domain = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2");
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![domain, limit], record_from_row)?;
                Ok(rows.collect::<Result<Vec<_>, _>>()?)
            })
            .await
            .map_err(Error::from)
    }

    /// Total number of stored analyses.
    pub async fn count_analyses(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM bias_analyses", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
