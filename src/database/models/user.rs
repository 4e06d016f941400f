use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    decode::Decode,
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    FromRow, Postgres, Type,
};

use crate::types::UserRole;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub clerk_user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub is_approved: bool,
    pub profile_complete: bool,
    #[serde(skip_serializing)]
    pub hashed_password: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn status(&self) -> &'static str {
        if self.is_active {
            "Active"
        } else {
            "Inactive"
        }
    }
}

/// Row to insert. Password accounts carry a hash, identity-provider ones don't.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub clerk_user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub hashed_password: Option<String>,
    pub is_approved: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub is_approved: Option<bool>,
    pub profile_complete: Option<bool>,
}

// Roles are TEXT columns; decoding normalises whatever casing a row carries.
impl Type<Postgres> for UserRole {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for UserRole {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        Ok(UserRole::normalize(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str, active: bool) -> User {
        User {
            id: 1,
            clerk_user_id: "local_abc".into(),
            email: "a@example.com".into(),
            first_name: first.into(),
            last_name: last.into(),
            phone_number: None,
            role: UserRole::Student,
            is_active: active,
            is_approved: false,
            profile_complete: false,
            hashed_password: Some("secret-hash".into()),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_value(user("Ada", "Lovelace", true)).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["role"], "STUDENT");
    }

    #[test]
    fn full_name_trims_missing_parts() {
        assert_eq!(user("Ada", "", true).full_name(), "Ada");
        assert_eq!(user("Ada", "Lovelace", false).status(), "Inactive");
    }
}
