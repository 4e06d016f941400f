use sqlx::PgPool;

use crate::database::models::{FileUpload, NewFileUpload, NewNotification, ReviewItem};
use crate::database::DatabaseError;
use crate::types::{file_type, FileStatus, NotificationType};

use super::notification_service::insert_notification;

const FILE_COLUMNS: &str = "id, user_id, file_name, file_path, file_size, mime_type, file_type, file_url, file_hash, \
     is_verified, verified_by, verification_notes, status, uploaded_at";

/// Unverified certificate or offer letter awaiting admin review
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct PendingCertificate {
    pub id: i64,
    pub file_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub file_type: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

/// Which placement documents a user has on file
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, sqlx::FromRow)]
pub struct DocumentFlags {
    pub resume_file_id: Option<i64>,
    pub offer_letter_file_id: Option<i64>,
}

impl DocumentFlags {
    pub fn has_verified_resume(&self) -> bool {
        self.resume_file_id.is_some()
    }

    pub fn has_offer_letter(&self) -> bool {
        self.offer_letter_file_id.is_some()
    }
}

fn verification_message(kind: &str, verified: bool, notes: Option<&str>) -> String {
    let state = if verified { "verified" } else { "marked as unverified" };
    match notes {
        Some(notes) if !notes.is_empty() => format!("Your {} has been {}. Notes: {}", kind, state, notes),
        _ => format!("Your {} has been {}.", kind, state),
    }
}

pub struct FileService {
    pool: PgPool,
}

impl FileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record_upload(&self, upload: &NewFileUpload) -> Result<FileUpload, DatabaseError> {
        let sql = format!(
            "INSERT INTO file_uploads (user_id, file_name, file_path, file_size, mime_type, file_type, file_url, file_hash, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            FILE_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(upload.user_id)
            .bind(&upload.file_name)
            .bind(&upload.file_path)
            .bind(upload.file_size)
            .bind(&upload.mime_type)
            .bind(&upload.file_type)
            .bind(&upload.file_url)
            .bind(&upload.file_hash)
            .bind(FileStatus::Pending.as_str())
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn find(&self, id: i64) -> Result<Option<FileUpload>, DatabaseError> {
        let sql = format!("SELECT {} FROM file_uploads WHERE id = $1", FILE_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    pub async fn get(&self, id: i64) -> Result<FileUpload, DatabaseError> {
        self.find(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("File not found".to_string()))
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<FileUpload>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM file_uploads WHERE user_id = $1 ORDER BY uploaded_at DESC, id DESC",
            FILE_COLUMNS
        );
        Ok(sqlx::query_as(&sql).bind(user_id).fetch_all(&self.pool).await?)
    }

    /// Set the verification flag and tell the owner.
    pub async fn verify(
        &self,
        id: i64,
        is_verified: bool,
        verified_by: Option<i64>,
        notes: Option<&str>,
    ) -> Result<FileUpload, DatabaseError> {
        let status = if is_verified { FileStatus::Verified } else { FileStatus::Pending };
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE file_uploads SET is_verified = $2, status = $3, \
                 verification_notes = COALESCE($4, verification_notes), \
                 verified_by = COALESCE($5, verified_by) \
             WHERE id = $1 RETURNING {}",
            FILE_COLUMNS
        );
        let file: FileUpload = sqlx::query_as(&sql)
            .bind(id)
            .bind(is_verified)
            .bind(status.as_str())
            .bind(notes.filter(|n| !n.is_empty()))
            .bind(verified_by)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("File not found".to_string()))?;

        let notice = NewNotification::system(
            file.user_id,
            "File Verification Status Updated",
            verification_message(&file.file_type, is_verified, notes),
        )
        .sent_by(verified_by)
        .related("file", file.id);
        insert_notification(&mut *tx, &notice).await?;

        tx.commit().await?;
        tracing::info!("File {} marked {}", id, status.as_str());
        Ok(file)
    }

    pub async fn reject(&self, id: i64, reason: &str) -> Result<FileUpload, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE file_uploads SET is_verified = FALSE, status = $2, \
                 verification_notes = COALESCE($3, verification_notes) \
             WHERE id = $1 RETURNING {}",
            FILE_COLUMNS
        );
        let reason = Some(reason.trim()).filter(|r| !r.is_empty());
        let file: FileUpload = sqlx::query_as(&sql)
            .bind(id)
            .bind(FileStatus::Rejected.as_str())
            .bind(reason)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("File not found".to_string()))?;

        let notice = NewNotification::system(
            file.user_id,
            "Resume Rejected",
            reason.unwrap_or("Your resume was rejected."),
        )
        .of_type(NotificationType::ProfileRejected)
        .related("file", file.id);
        insert_notification(&mut *tx, &notice).await?;

        tx.commit().await?;
        tracing::info!("File {} rejected", id);
        Ok(file)
    }

    /// Resumes in the given review state, with their owners
    pub async fn resumes_with_status(&self, status: FileStatus) -> Result<Vec<ReviewItem>, DatabaseError> {
        Ok(sqlx::query_as(
            "SELECT f.id, u.first_name, u.last_name, u.email, f.file_name, f.file_type, f.uploaded_at, f.status, f.file_url \
             FROM file_uploads f JOIN users u ON u.id = f.user_id \
             WHERE f.file_type = $1 AND f.status = $2 ORDER BY f.uploaded_at DESC, f.id DESC",
        )
        .bind(file_type::RESUME)
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn pending_certificates(&self) -> Result<Vec<PendingCertificate>, DatabaseError> {
        Ok(sqlx::query_as(
            "SELECT f.id, f.file_name, u.first_name, u.last_name, u.email, f.file_type, f.uploaded_at \
             FROM file_uploads f JOIN users u ON u.id = f.user_id \
             WHERE f.file_type IN ($1, $2) AND f.is_verified = FALSE ORDER BY f.uploaded_at, f.id",
        )
        .bind(file_type::CERTIFICATE)
        .bind(file_type::OFFER_LETTER)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Latest verified resume and latest offer letter, verified or not.
    pub async fn document_flags(&self, user_id: i64) -> Result<DocumentFlags, DatabaseError> {
        Ok(sqlx::query_as(
            "SELECT \
                 (SELECT id FROM file_uploads WHERE user_id = $1 AND file_type = $2 AND is_verified \
                  ORDER BY uploaded_at DESC, id DESC LIMIT 1) AS resume_file_id, \
                 (SELECT id FROM file_uploads WHERE user_id = $1 AND file_type = $3 \
                  ORDER BY uploaded_at DESC, id DESC LIMIT 1) AS offer_letter_file_id",
        )
        .bind(user_id)
        .bind(file_type::RESUME)
        .bind(file_type::OFFER_LETTER)
        .fetch_one(&self.pool)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_messages() {
        assert_eq!(verification_message("resume", true, None), "Your resume has been verified.");
        assert_eq!(
            verification_message("offer_letter", false, Some("blurry scan")),
            "Your offer_letter has been marked as unverified. Notes: blurry scan"
        );
        assert_eq!(verification_message("resume", true, Some("")), "Your resume has been verified.");
    }

    #[test]
    fn flags_report_presence() {
        let flags = DocumentFlags { resume_file_id: Some(3), offer_letter_file_id: None };
        assert!(flags.has_verified_resume());
        assert!(!flags.has_offer_letter());
    }
}
