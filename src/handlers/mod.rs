// handlers/mod.rs - Three-tier handler layout
//
// public (no role check)  → /api/v1/{users,jobs,events,files,notifications}
// tpo    (TPO or ADMIN)   → /api/v1/tpo/*
// admin  (ADMIN)          → /api/v1/admin/*
//
// Role checks live in middleware::auth and are only enforced when
// security.require_auth is set.

pub mod admin;
pub mod public;
pub mod system;
pub mod tpo;

use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::ApiError;

/// `?skip=&limit=` on list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn resolve(&self, config: &AppConfig) -> (i64, i64) {
        config.page(self.skip, self.limit)
    }
}

/// Trimmed value of a required string field, or a validation error naming it.
pub(crate) fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::field(field, "This field is required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        assert_eq!(required("email", Some("  a@b.c ")).unwrap(), "a@b.c");
        assert!(required("email", Some("   ")).is_err());
        assert!(required("email", None).is_err());
    }

    #[test]
    fn page_query_uses_config_defaults() {
        let config = AppConfig::development();
        assert_eq!(PageQuery::default().resolve(&config), (0, config.api.default_page_limit));
    }
}
