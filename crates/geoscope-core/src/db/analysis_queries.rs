//! Analysis archive queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, Row};

use crate::{
    error::{DatabaseResultExt, GeoscopeError, Result},
    models::{AnalysisResult, HistoryEntry},
};

const UPSERT_ANALYSIS_SQL: &str = "INSERT INTO analyses (id, timestamp, query, brand, visibility_rate, num_hypotheses, num_recommendations, summary, payload, saved_at) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
     ON CONFLICT(id) DO UPDATE SET timestamp = excluded.timestamp, query = excluded.query, brand = excluded.brand, \
     visibility_rate = excluded.visibility_rate, num_hypotheses = excluded.num_hypotheses, \
     num_recommendations = excluded.num_recommendations, summary = excluded.summary, \
     payload = excluded.payload, saved_at = excluded.saved_at";
const SELECT_PAYLOAD_SQL: &str = "SELECT payload FROM analyses WHERE id = ?1";
const DELETE_ALL_SQL: &str = "DELETE FROM analyses";

const ENTRY_COLUMNS: &str =
    "id, timestamp, query, brand, visibility_rate, num_hypotheses, num_recommendations, saved_at";

/// A history row from the local archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchivedEntry {
    pub entry: HistoryEntry,
    /// When the analysis was written to the archive (UTC)
    pub saved_at: Timestamp,
}

impl super::Database {
    /// Stores `result`, replacing any earlier copy with the same id.
    pub fn save_analysis(&mut self, result: &AnalysisResult) -> Result<ArchivedEntry> {
        if result.id.trim().is_empty() {
            return Err(GeoscopeError::invalid_input("id")
                .with_reason("Cannot archive an analysis without an ID"));
        }

        let payload = serde_json::to_string(result)?;
        let entry = HistoryEntry::from(result);
        let saved_at = Timestamp::now();

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        tx.execute(
            UPSERT_ANALYSIS_SQL,
            params![
                entry.analysis_id,
                entry.timestamp,
                entry.query,
                entry.brand,
                entry.visibility_rate,
                entry.num_hypotheses,
                entry.num_recommendations,
                result.summary,
                payload,
                saved_at.as_microsecond(),
            ],
        )
        .db_context("Failed to insert analysis")?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(ArchivedEntry { entry, saved_at })
    }

    /// Retrieves the full analysis with `id`.
    pub fn get_analysis(&self, id: &str) -> Result<Option<AnalysisResult>> {
        let payload: Option<String> = self
            .connection
            .query_row(SELECT_PAYLOAD_SQL, params![id], |row| row.get(0))
            .optional()
            .db_context("Failed to query analysis")?;

        payload
            .map(|json| serde_json::from_str(&json).map_err(GeoscopeError::from))
            .transpose()
    }

    /// Lists archived analyses, newest first, optionally for one brand.
    pub fn recent_analyses(&self, brand: Option<&str>, limit: u32) -> Result<Vec<ArchivedEntry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM analyses WHERE (?1 IS NULL OR brand = ?1) \
             ORDER BY saved_at DESC, rowid DESC LIMIT ?2"
        );
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;
        let rows = stmt
            .query_map(params![brand, limit], map_entry)
            .db_context("Failed to list analyses")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read analysis row")
    }

    /// Case-insensitive substring search over query, brand and summary.
    pub fn search_analyses(&self, text: &str, limit: u32) -> Result<Vec<ArchivedEntry>> {
        let pattern = format!("%{}%", escape_like(&text.to_lowercase()));
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM analyses \
             WHERE lower(query) LIKE ?1 ESCAPE '\\' OR lower(brand) LIKE ?1 ESCAPE '\\' \
             OR lower(summary) LIKE ?1 ESCAPE '\\' \
             ORDER BY saved_at DESC, rowid DESC LIMIT ?2"
        );
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;
        let rows = stmt
            .query_map(params![pattern, limit], map_entry)
            .db_context("Failed to search analyses")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read analysis row")
    }

    /// Removes every archived analysis and returns how many were removed.
    pub fn clear_analyses(&mut self) -> Result<usize> {
        self.connection
            .execute(DELETE_ALL_SQL, [])
            .db_context("Failed to clear analyses")
    }
}

fn map_entry(row: &Row<'_>) -> rusqlite::Result<ArchivedEntry> {
    let saved_at = Timestamp::from_microsecond(row.get(7)?)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Integer, Box::new(e)))?;

    Ok(ArchivedEntry {
        entry: HistoryEntry {
            analysis_id: row.get(0)?,
            timestamp: row.get(1)?,
            query: row.get(2)?,
            brand: row.get(3)?,
            visibility_rate: row.get(4)?,
            num_hypotheses: row.get(5)?,
            num_recommendations: row.get(6)?,
        },
        saved_at,
    })
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
        assert_eq!(escape_like("crm"), "crm");
    }
}
