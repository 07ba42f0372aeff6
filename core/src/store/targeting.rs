use super::InsightStore;
use crate::{
    error::InsightResult,
    types::{UserId, ALL_TARGETS},
};
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

/// Which region / age bracket a dashboard user is targeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetingConfig {
    pub user_id:       UserId,
    pub target_region: String,
    pub target_age:    String,
}

impl TargetingConfig {
    /// Untargeted preference (`전체` / `전체`).
    pub fn unrestricted(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id:       user_id.into(),
            target_region: ALL_TARGETS.to_string(),
            target_age:    ALL_TARGETS.to_string(),
        }
    }
}

impl InsightStore {
    // ── Targeting preference ──────────────────────────────────────

    /// Fetch the user's preference, creating the untargeted default on first read.
    pub fn targeting_config(&self, user_id: &str) -> InsightResult<TargetingConfig> {
        let existing = self
            .conn
            .query_row(
                "SELECT user_id, target_region, target_age
                 FROM user_config WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(TargetingConfig {
                        user_id:       row.get(0)?,
                        target_region: row.get(1)?,
                        target_age:    row.get(2)?,
                    })
                },
            )
            .optional()?;

        match existing {
            Some(config) => Ok(config),
            None => {
                let config = TargetingConfig::unrestricted(user_id);
                self.save_targeting_config(&config)?;
                log::debug!("store: created default targeting config for {user_id}");
                Ok(config)
            }
        }
    }

    pub fn save_targeting_config(&self, config: &TargetingConfig) -> InsightResult<()> {
        let non_blank = |v: &str| {
            if v.trim().is_empty() { ALL_TARGETS.to_string() } else { v.trim().to_string() }
        };
        self.conn.execute(
            "INSERT INTO user_config (user_id, target_region, target_age, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                target_region = excluded.target_region,
                target_age    = excluded.target_age,
                updated_at    = excluded.updated_at",
            params![
                &config.user_id,
                non_blank(&config.target_region),
                non_blank(&config.target_age),
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}
