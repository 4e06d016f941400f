use sqlx::PgPool;

use crate::database::models::profile::{APPROVAL_APPROVED, APPROVAL_REJECTED};
use crate::database::models::{NewNotification, Profile, ProfileFields};
use crate::database::DatabaseError;

use super::notification_service::insert_notification;

const PROFILE_COLUMNS: &str = "id, user_id, phone, degree, year, skills, about, profile_image_url, alternate_email, \
     placement_status, approval_status, company_name, offer_letter_url, is_approved, approval_notes, \
     created_at, updated_at";

/// Outcome of a TPO review
#[derive(Debug, Clone)]
pub enum ReviewDecision {
    Approve { notes: Option<String> },
    Reject { reason: Option<String> },
}

impl ReviewDecision {
    fn notification(&self, user_id: i64, sent_by: Option<i64>) -> NewNotification {
        let (title, message) = match self {
            ReviewDecision::Approve { notes } => (
                "Profile Approved",
                match notes {
                    Some(notes) => format!("Your profile has been approved by the TPO. Notes: {}", notes),
                    None => "Your profile has been approved by the TPO.".to_string(),
                },
            ),
            ReviewDecision::Reject { reason } => (
                "Profile Rejected",
                reason.clone().unwrap_or_else(|| "Your profile was rejected.".to_string()),
            ),
        };
        NewNotification::system(user_id, title, message).sent_by(sent_by)
    }
}

pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, user_id: i64) -> Result<Option<Profile>, DatabaseError> {
        let sql = format!("SELECT {} FROM profiles WHERE user_id = $1", PROFILE_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(user_id).fetch_optional(&self.pool).await?)
    }

    /// Create the profile, or apply the supplied fields to the existing one.
    pub async fn upsert(&self, user_id: i64, fields: &ProfileFields) -> Result<Profile, DatabaseError> {
        let sql = format!(
            "INSERT INTO profiles (user_id, phone, degree, year, skills, about, profile_image_url, alternate_email, \
                 placement_status, company_name, offer_letter_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'Not Placed'), $10, $11) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 phone = COALESCE(EXCLUDED.phone, profiles.phone), \
                 degree = COALESCE(EXCLUDED.degree, profiles.degree), \
                 year = COALESCE(EXCLUDED.year, profiles.year), \
                 skills = COALESCE(EXCLUDED.skills, profiles.skills), \
                 about = COALESCE(EXCLUDED.about, profiles.about), \
                 profile_image_url = COALESCE(EXCLUDED.profile_image_url, profiles.profile_image_url), \
                 alternate_email = COALESCE(EXCLUDED.alternate_email, profiles.alternate_email), \
                 placement_status = COALESCE($9, profiles.placement_status), \
                 company_name = COALESCE(EXCLUDED.company_name, profiles.company_name), \
                 offer_letter_url = COALESCE(EXCLUDED.offer_letter_url, profiles.offer_letter_url), \
                 updated_at = NOW() \
             RETURNING {}",
            PROFILE_COLUMNS
        );
        Ok(bind_fields(sqlx::query_as(&sql).bind(user_id), fields)
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn update(&self, user_id: i64, fields: &ProfileFields) -> Result<Profile, DatabaseError> {
        let sql = format!(
            "UPDATE profiles SET \
                 phone = COALESCE($2, phone), \
                 degree = COALESCE($3, degree), \
                 year = COALESCE($4, year), \
                 skills = COALESCE($5, skills), \
                 about = COALESCE($6, about), \
                 profile_image_url = COALESCE($7, profile_image_url), \
                 alternate_email = COALESCE($8, alternate_email), \
                 placement_status = COALESCE($9, placement_status), \
                 company_name = COALESCE($10, company_name), \
                 offer_letter_url = COALESCE($11, offer_letter_url), \
                 updated_at = NOW() \
             WHERE user_id = $1 RETURNING {}",
            PROFILE_COLUMNS
        );
        bind_fields(sqlx::query_as(&sql).bind(user_id), fields)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Profile not found".to_string()))
    }

    /// Apply a review to both the profile and the owning user, then notify them.
    pub async fn review(
        &self,
        user_id: i64,
        decision: &ReviewDecision,
        sent_by: Option<i64>,
    ) -> Result<Profile, DatabaseError> {
        let (approved, status, notes) = match decision {
            ReviewDecision::Approve { notes } => (true, APPROVAL_APPROVED, notes.as_deref()),
            ReviewDecision::Reject { reason } => (false, APPROVAL_REJECTED, reason.as_deref()),
        };

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE profiles SET is_approved = $2, approval_status = $3, \
                 approval_notes = COALESCE($4, approval_notes), updated_at = NOW() \
             WHERE user_id = $1 RETURNING {}",
            PROFILE_COLUMNS
        );
        let profile: Profile = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(approved)
            .bind(status)
            .bind(notes.filter(|n| !n.is_empty()))
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Profile not found".to_string()))?;

        sqlx::query("UPDATE users SET is_approved = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(approved)
            .execute(&mut *tx)
            .await?;

        insert_notification(&mut *tx, &decision.notification(user_id, sent_by)).await?;
        tx.commit().await?;

        tracing::info!("Profile for user {} marked {}", user_id, status);
        Ok(profile)
    }
}

type ProfileQuery<'q> = sqlx::query::QueryAs<'q, sqlx::Postgres, Profile, sqlx::postgres::PgArguments>;

fn bind_fields<'q>(query: ProfileQuery<'q>, fields: &'q ProfileFields) -> ProfileQuery<'q> {
    query
        .bind(&fields.phone)
        .bind(&fields.degree)
        .bind(&fields.year)
        .bind(&fields.skills)
        .bind(&fields.about)
        .bind(&fields.profile_image_url)
        .bind(&fields.alternate_email)
        .bind(&fields.placement_status)
        .bind(&fields.company_name)
        .bind(&fields.offer_letter_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_message_carries_notes() {
        let decision = ReviewDecision::Approve { notes: Some("Great CV".into()) };
        let n = decision.notification(4, Some(2));
        assert_eq!(n.title, "Profile Approved");
        assert_eq!(n.message, "Your profile has been approved by the TPO. Notes: Great CV");
        assert_eq!(n.sent_by, Some(2));
    }

    #[test]
    fn rejection_falls_back_to_default_message() {
        let n = ReviewDecision::Reject { reason: None }.notification(4, None);
        assert_eq!(n.title, "Profile Rejected");
        assert_eq!(n.message, "Your profile was rejected.");
    }
}
