//! Notification de-duplication.
//!
//! Repeated sends can leave several identical notifications for one user.
//! For each `(user_id, message)` pair the oldest row is kept and the rest
//! are deleted. Running it again deletes nothing.

use std::collections::HashSet;
use std::time::Instant;

use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct NotificationKey {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupeReport {
    pub scanned: usize,
    pub duplicates: Vec<Uuid>,
    pub deleted: u64,
}

/// Ids to delete: every row except the oldest of its `(user_id, message)`
/// group. Ties on `created_at` keep the smallest id.
pub fn plan_removals(rows: &[NotificationKey]) -> Vec<Uuid> {
    let mut ordered: Vec<&NotificationKey> = rows.iter().collect();
    ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let mut seen: HashSet<(Uuid, &str)> = HashSet::new();
    let mut removals = Vec::new();
    for row in ordered {
        if !seen.insert((row.user_id, row.message.as_str())) {
            removals.push(row.id);
        }
    }
    removals
}

pub async fn dedupe_notifications(db: &PgPool, dry_run: bool) -> anyhow::Result<DedupeReport> {
    let start_time = Instant::now();

    let rows = sqlx::query_as::<_, NotificationKey>(
        "SELECT id, user_id, message, created_at FROM notifications",
    )
    .fetch_all(db)
    .await
    .context("Failed to load notifications")?;

    let duplicates = plan_removals(&rows);
    println!(
        "🔎 Scanned {} notifications, {} duplicates",
        rows.len(),
        duplicates.len()
    );

    let deleted = if dry_run || duplicates.is_empty() {
        0
    } else {
        sqlx::query("DELETE FROM notifications WHERE id = ANY($1)")
            .bind(&duplicates)
            .execute(db)
            .await
            .context("Failed to delete duplicate notifications")?
            .rows_affected()
    };

    println!("   ✓ Done in {:?}", start_time.elapsed());

    Ok(DedupeReport {
        scanned: rows.len(),
        duplicates,
        deleted,
    })
}
