use super::InsightStore;
use crate::{
    error::{InsightError, InsightResult},
    types::NoteId,
};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingNote {
    pub id:         NoteId,
    pub content:    String,
    pub created_at: DateTime<Utc>,
}

impl InsightStore {
    // ── Marketing notes ───────────────────────────────────────────

    pub fn add_marketing_note(&self, content: &str) -> InsightResult<MarketingNote> {
        let content = content.trim();
        if content.is_empty() {
            return Err(InsightError::EmptyNote);
        }

        let note = MarketingNote {
            id:         uuid::Uuid::new_v4().to_string(),
            content:    content.to_string(),
            created_at: Utc::now().trunc_subsecs(6),
        };
        // seq is the insertion order; listing sorts on it.
        self.conn.execute(
            "INSERT INTO marketing_action (action_id, content, created_at, seq)
             VALUES (?1, ?2, ?3, (SELECT COALESCE(MAX(seq), 0) + 1 FROM marketing_action))",
            params![
                &note.id,
                &note.content,
                note.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;
        Ok(note)
    }

    /// All notes, newest first.
    pub fn marketing_notes(&self) -> InsightResult<Vec<MarketingNote>> {
        let mut stmt = self.conn.prepare(
            "SELECT action_id, content, created_at
             FROM marketing_action
             ORDER BY seq DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, content, created_at)| -> InsightResult<MarketingNote> {
                let created_at = DateTime::parse_from_rfc3339(&created_at)
                    .map_err(|e| anyhow::anyhow!("note {id} has bad created_at '{created_at}': {e}"))?
                    .with_timezone(&Utc);
                Ok(MarketingNote { id, content, created_at })
            })
            .collect()
    }

    pub fn delete_marketing_note(&self, id: &str) -> InsightResult<()> {
        let deleted = self.conn.execute(
            "DELETE FROM marketing_action WHERE action_id = ?1",
            params![id],
        )?;
        if deleted == 0 {
            return Err(InsightError::NoteNotFound { id: id.to_string() });
        }
        Ok(())
    }
}
