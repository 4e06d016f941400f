use axum::http::{header, request::Parts, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::SecurityConfig;

/// Configured origins, plus Vercel preview deployments when enabled.
pub fn origin_allowed(origin: &str, security: &SecurityConfig) -> bool {
    if security.cors_origins.iter().any(|allowed| allowed == origin) {
        return true;
    }
    security.allow_vercel_previews && is_vercel_preview(origin)
}

fn is_vercel_preview(origin: &str) -> bool {
    match origin.strip_prefix("https://").and_then(|host| host.strip_suffix(".vercel.app")) {
        Some(sub) => !sub.is_empty() && sub.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.'),
        None => false,
    }
}

pub fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let security = security.clone();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
            origin.to_str().map(|o| origin_allowed(o, &security)).unwrap_or(false)
        }))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
