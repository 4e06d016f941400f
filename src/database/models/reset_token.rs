use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        !self.used && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn expired_or_used_tokens_are_rejected() {
        let now = Utc::now();
        let mut token = PasswordResetToken {
            id: 1,
            user_id: 1,
            token: "abc".into(),
            expires_at: now + Duration::minutes(5),
            used: false,
            created_at: now,
        };
        assert!(token.is_redeemable(now));
        token.used = true;
        assert!(!token.is_redeemable(now));
        token.used = false;
        token.expires_at = now - Duration::seconds(1);
        assert!(!token.is_redeemable(now));
    }
}
