use crate::entities::{activity_logs, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

pub struct LogRepository {
    conn: DatabaseConnection,
}

impl LogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, username: &str, action: &str, detail: Option<String>) -> Result<()> {
        let active_model = activity_logs::ActiveModel {
            username: Set(username.to_string()),
            action: Set(action.to_string()),
            detail: Set(detail),
            created_at: Set(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)),
            ..Default::default()
        };

        ActivityLogs::insert(active_model)
            .exec(&self.conn)
            .await
            .context("Failed to write activity log")?;
        Ok(())
    }

    /// Newest first. `action_filter` is a substring match.
    pub async fn recent(
        &self,
        limit: u64,
        username_filter: Option<String>,
        action_filter: Option<String>,
    ) -> Result<Vec<activity_logs::Model>> {
        let mut query = ActivityLogs::find()
            .order_by_desc(activity_logs::Column::CreatedAt)
            .order_by_desc(activity_logs::Column::Id);

        if let Some(username) = username_filter {
            query = query.filter(activity_logs::Column::Username.eq(username));
        }

        if let Some(action) = action_filter {
            query = query.filter(activity_logs::Column::Action.contains(action));
        }

        let items = query
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query activity logs")?;

        Ok(items)
    }
}
