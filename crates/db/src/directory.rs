//! Postgres-backed [`UserDirectory`].

use std::collections::HashMap;

use askboard_core::types::DbId;
use askboard_core::users::{UserDirectory, UNKNOWN_USER_NAME};
use async_trait::async_trait;
use sqlx::PgPool;

use crate::repositories::UserRepo;

/// Resolves display names from the `users` table.
///
/// Lookup failures are logged and reported as [`UNKNOWN_USER_NAME`]; they
/// never propagate into the query that asked for the name.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn display_name(&self, user_id: DbId) -> String {
        match UserRepo::find_by_id(&self.pool, user_id).await {
            Ok(Some(user)) => user.display_name,
            Ok(None) => UNKNOWN_USER_NAME.to_string(),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Display name lookup failed");
                UNKNOWN_USER_NAME.to_string()
            }
        }
    }

    async fn display_names(&self, user_ids: &[DbId]) -> HashMap<DbId, String> {
        let mut names: HashMap<DbId, String> = match UserRepo::find_display_names(
            &self.pool, user_ids,
        )
        .await
        {
            Ok(rows) => rows.into_iter().collect(),
            Err(e) => {
                tracing::warn!(count = user_ids.len(), error = %e, "Display name lookup failed");
                HashMap::new()
            }
        };

        for &id in user_ids {
            names
                .entry(id)
                .or_insert_with(|| UNKNOWN_USER_NAME.to_string());
        }
        names
    }
}
