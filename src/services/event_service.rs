use sqlx::PgPool;

use crate::database::models::{Event, EventChanges, EventRegistration, NewEvent, RegistrantView};
use crate::database::DatabaseError;

const EVENT_COLUMNS: &str = "id, title, description, location, event_date, event_time, event_type, form_url, status, \
     registered_count, max_participants, is_active, created_by, created_at, updated_at";
const REGISTRATION_COLUMNS: &str = "id, event_id, user_id, registration_status, registered_at";

pub struct EventService {
    pool: PgPool,
}

impl EventService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, event: &NewEvent) -> Result<Event, DatabaseError> {
        let sql = format!(
            "INSERT INTO events (title, description, location, event_date, event_time, event_type, form_url, status, \
                 max_participants, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'Upcoming'), $9, $10) RETURNING {}",
            EVENT_COLUMNS
        );
        let created: Event = sqlx::query_as(&sql)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.event_date)
            .bind(&event.event_time)
            .bind(&event.event_type)
            .bind(&event.form_url)
            .bind(&event.status)
            .bind(event.max_participants)
            .bind(event.created_by)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!("Created event {} '{}'", created.id, created.title);
        Ok(created)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Event>, DatabaseError> {
        let sql = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    pub async fn list(&self, status: Option<&str>, skip: i64, limit: i64) -> Result<Vec<Event>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM events WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY id OFFSET $2 LIMIT $3",
            EVENT_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(status)
            .bind(skip)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Latest event date first; undated events last.
    pub async fn list_by_date(&self, skip: i64, limit: i64) -> Result<Vec<Event>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM events ORDER BY event_date DESC NULLS LAST, id DESC OFFSET $1 LIMIT $2",
            EVENT_COLUMNS
        );
        Ok(sqlx::query_as(&sql).bind(skip).bind(limit).fetch_all(&self.pool).await?)
    }

    pub async fn update(&self, id: i64, changes: &EventChanges) -> Result<Event, DatabaseError> {
        let sql = format!(
            "UPDATE events SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 location = COALESCE($4, location), \
                 event_date = COALESCE($5, event_date), \
                 event_time = COALESCE($6, event_time), \
                 event_type = COALESCE($7, event_type), \
                 form_url = COALESCE($8, form_url), \
                 status = COALESCE($9, status), \
                 max_participants = COALESCE($10, max_participants), \
                 is_active = COALESCE($11, is_active), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            EVENT_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(&changes.location)
            .bind(changes.event_date)
            .bind(&changes.event_time)
            .bind(&changes.event_type)
            .bind(&changes.form_url)
            .bind(&changes.status)
            .bind(changes.max_participants)
            .bind(changes.is_active)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Event not found".to_string()))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1").bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Event not found".to_string()));
        }
        tracing::info!("Deleted event {}", id);
        Ok(())
    }

    pub async fn is_registered(&self, event_id: i64, user_id: i64) -> Result<bool, DatabaseError> {
        let (registered,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM event_registrations WHERE event_id = $1 AND user_id = $2)")
                .bind(event_id)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(registered)
    }

    /// Registration row and counter bump commit together.
    pub async fn register(&self, event_id: i64, user_id: i64) -> Result<EventRegistration, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO event_registrations (event_id, user_id) VALUES ($1, $2) RETURNING {}",
            REGISTRATION_COLUMNS
        );
        let registration: EventRegistration = sqlx::query_as(&sql)
            .bind(event_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match DatabaseError::from(e) {
                DatabaseError::Conflict(_) => {
                    DatabaseError::Conflict("User already registered for this event".to_string())
                }
                other => other,
            })?;

        sqlx::query("UPDATE events SET registered_count = registered_count + 1 WHERE id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!("User {} registered for event {}", user_id, event_id);
        Ok(registration)
    }

    pub async fn registrations(&self, event_id: i64) -> Result<Vec<EventRegistration>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM event_registrations WHERE event_id = $1 ORDER BY registered_at, id",
            REGISTRATION_COLUMNS
        );
        Ok(sqlx::query_as(&sql).bind(event_id).fetch_all(&self.pool).await?)
    }

    pub async fn registrants(&self, event_id: i64) -> Result<Vec<RegistrantView>, DatabaseError> {
        Ok(sqlx::query_as(
            "SELECT r.id, u.id AS user_id, TRIM(u.first_name || ' ' || u.last_name) AS name, u.email, \
                 r.registration_status AS status, r.registered_at \
             FROM event_registrations r JOIN users u ON u.id = r.user_id \
             WHERE r.event_id = $1 ORDER BY r.registered_at, r.id",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
