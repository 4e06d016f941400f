use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;
use crate::services::UserService;
use crate::types::UserRole;
use crate::AppState;

/// Authenticated caller, inserted into request extensions
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub role: UserRole,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err(ApiError::unauthorized("Empty JWT token")),
        None => Err(ApiError::unauthorized("Authorization header must use Bearer token format")),
    }
}

/// Token, role, then account state. Skipped entirely when auth isn't enforced.
async fn authorize(state: &AppState, request: &mut Request, allowed: &[UserRole]) -> Result<(), ApiError> {
    if !state.config.security.require_auth {
        return Ok(());
    }

    let token = extract_jwt_from_headers(request.headers())?;
    let auth_user = AuthUser::from(validate_jwt(token, &state.config.security)?);

    if !allowed.contains(&auth_user.role) {
        tracing::warn!(
            "User {} with role {} denied access to {}",
            auth_user.user_id,
            auth_user.role,
            request.uri().path()
        );
        return Err(ApiError::forbidden("Insufficient permissions"));
    }

    let user = UserService::new(state.db.clone()).find(auth_user.user_id).await?;
    match user {
        Some(user) if user.is_active => {}
        _ => return Err(ApiError::unauthorized("Account is inactive or no longer exists")),
    }

    request.extensions_mut().insert(auth_user);
    Ok(())
}

/// Guards `/admin/*`
pub async fn require_admin(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response, ApiError> {
    authorize(&state, &mut request, &[UserRole::Admin]).await?;
    Ok(next.run(request).await)
}

/// Guards `/tpo/*`; admins may act as placement officers.
pub async fn require_staff(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response, ApiError> {
    authorize(&state, &mut request, &[UserRole::Tpo, UserRole::Admin]).await?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_jwt_from_headers(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn malformed_headers_are_unauthorized() {
        assert!(extract_jwt_from_headers(&HeaderMap::new()).is_err());
        assert!(extract_jwt_from_headers(&headers("Basic dXNlcjpwYXNz")).is_err());
        let err = extract_jwt_from_headers(&headers("Bearer   ")).unwrap_err();
        assert_eq!(err.error_code(), "UNAUTHORIZED");
    }
}
