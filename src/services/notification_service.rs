use chrono::Utc;
use sqlx::{Executor, PgPool, Postgres};

use crate::database::models::{BroadcastGroup, NewNotification, Notification};
use crate::database::DatabaseError;
use crate::types::NotificationType;

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, title, message, notification_type, is_read, related_id, related_type, sent_by, created_at, read_at";

/// How many SYSTEM notifications the history view scans
const HISTORY_SCAN_LIMIT: i64 = 500;
const HISTORY_GROUPS: usize = 20;
/// Rows of one broadcast are written within this many seconds of each other
const BROADCAST_WINDOW_SECS: i64 = 60;

/// Insert on any executor so callers can include it in their transaction.
pub(crate) async fn insert_notification<'e, E>(executor: E, new: &NewNotification) -> Result<Notification, DatabaseError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "INSERT INTO notifications (user_id, title, message, notification_type, related_id, related_type, sent_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
        NOTIFICATION_COLUMNS
    );
    Ok(sqlx::query_as(&sql)
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.notification_type.as_str())
        .bind(new.related_id)
        .bind(&new.related_type)
        .bind(new.sent_by)
        .fetch_one(executor)
        .await?)
}

/// Collapse a newest-first list into broadcasts: consecutive rows with the same
/// title and message, each within the window of the group's first row.
pub fn group_broadcasts(notifications: &[Notification], max_groups: usize) -> Vec<BroadcastGroup> {
    let mut groups: Vec<BroadcastGroup> = Vec::new();

    for n in notifications {
        if let Some(current) = groups.last_mut() {
            let gap = (current.sent_at - n.created_at).num_seconds().abs();
            if current.title == n.title && current.message == n.message && gap < BROADCAST_WINDOW_SECS {
                current.recipient_count += 1;
                continue;
            }
        }
        if groups.len() == max_groups {
            break;
        }
        groups.push(BroadcastGroup {
            title: n.title.clone(),
            message: n.message.clone(),
            sent_at: n.created_at,
            recipient_count: 1,
        });
    }

    groups
}

pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewNotification) -> Result<Notification, DatabaseError> {
        insert_notification(&self.pool, new).await
    }

    pub async fn find(&self, id: i64) -> Result<Option<Notification>, DatabaseError> {
        let sql = format!("SELECT {} FROM notifications WHERE id = $1", NOTIFICATION_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Notification>, DatabaseError> {
        let sql = format!("SELECT {} FROM notifications ORDER BY id OFFSET $1 LIMIT $2", NOTIFICATION_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(skip).bind(limit).fetch_all(&self.pool).await?)
    }

    pub async fn list_for_user(&self, user_id: i64, skip: i64, limit: i64) -> Result<Vec<Notification>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3",
            NOTIFICATION_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(user_id)
            .bind(skip)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    /// `read_at` follows the flag: stamped when read, cleared when unread.
    pub async fn set_read(&self, id: i64, is_read: bool) -> Result<Notification, DatabaseError> {
        let sql = format!(
            "UPDATE notifications SET is_read = $2, read_at = CASE WHEN $2 THEN $3 ELSE NULL END \
             WHERE id = $1 RETURNING {}",
            NOTIFICATION_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(id)
            .bind(is_read)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Notification not found".to_string()))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Notification not found".to_string()));
        }
        Ok(())
    }

    /// One SYSTEM notification per student whose profile matches the filters.
    /// Empty filters match everyone.
    pub async fn broadcast_to_students(
        &self,
        title: &str,
        message: &str,
        degree: Option<&str>,
        year: Option<&str>,
        sent_by: Option<i64>,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO notifications (user_id, title, message, notification_type, sent_by) \
             SELECT u.id, $1, $2, $3, $6 FROM users u JOIN profiles p ON p.user_id = u.id \
             WHERE UPPER(u.role) = 'STUDENT' \
               AND ($4::TEXT IS NULL OR p.degree = $4) \
               AND ($5::TEXT IS NULL OR p.year = $5)",
        )
        .bind(title)
        .bind(message)
        .bind(NotificationType::System.as_str())
        .bind(degree.filter(|d| !d.is_empty()))
        .bind(year.filter(|y| !y.is_empty()))
        .bind(sent_by)
        .execute(&self.pool)
        .await?;

        tracing::info!("Broadcast '{}' to {} students", title, result.rows_affected());
        Ok(result.rows_affected())
    }

    pub async fn broadcast_history(&self) -> Result<Vec<BroadcastGroup>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM notifications WHERE notification_type = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
            NOTIFICATION_COLUMNS
        );
        let recent: Vec<Notification> = sqlx::query_as(&sql)
            .bind(NotificationType::System.as_str())
            .bind(HISTORY_SCAN_LIMIT)
            .fetch_all(&self.pool)
            .await?;
        Ok(group_broadcasts(&recent, HISTORY_GROUPS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn notification(id: i64, title: &str, message: &str, at: DateTime<Utc>) -> Notification {
        Notification {
            id,
            user_id: id,
            title: title.into(),
            message: message.into(),
            notification_type: "SYSTEM".into(),
            is_read: false,
            related_id: None,
            related_type: None,
            sent_by: None,
            created_at: at,
            read_at: None,
        }
    }

    #[test]
    fn rows_of_one_broadcast_collapse() {
        let t = base();
        let rows = vec![
            notification(3, "Drive", "Infosys on Monday", t),
            notification(2, "Drive", "Infosys on Monday", t - Duration::seconds(1)),
            notification(1, "Drive", "Infosys on Monday", t - Duration::seconds(2)),
        ];
        let groups = group_broadcasts(&rows, 20);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].recipient_count, 3);
        assert_eq!(groups[0].sent_at, t);
    }

    #[test]
    fn window_is_measured_from_group_start() {
        let t = base();
        let rows = vec![
            notification(3, "Drive", "Same", t),
            notification(2, "Drive", "Same", t - Duration::seconds(59)),
            notification(1, "Drive", "Same", t - Duration::seconds(60)),
        ];
        let groups = group_broadcasts(&rows, 20);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].recipient_count, 2);
        assert_eq!(groups[1].sent_at, t - Duration::seconds(60));
    }

    #[test]
    fn different_text_starts_new_group() {
        let t = base();
        let rows = vec![
            notification(3, "A", "x", t),
            notification(2, "B", "x", t),
            notification(1, "A", "x", t),
        ];
        let groups = group_broadcasts(&rows, 20);
        assert_eq!(groups.iter().map(|g| g.title.as_str()).collect::<Vec<_>>(), ["A", "B", "A"]);
    }

    #[test]
    fn group_count_is_capped() {
        let t = base();
        let rows: Vec<Notification> = (0..30)
            .map(|i| notification(i, &format!("T{}", i), "m", t - Duration::minutes(i)))
            .collect();
        let groups = group_broadcasts(&rows, 20);
        assert_eq!(groups.len(), 20);
        assert_eq!(groups[19].title, "T19");
    }

    #[test]
    fn empty_input_gives_no_groups() {
        assert!(group_broadcasts(&[], 20).is_empty());
    }
}
