use axum::http::{HeaderValue, Method, header, request::Parts};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

const LOCAL_DEV_ORIGIN: &str = "http://localhost:3000";
const DEPLOY_ROOT: &str = "https://vercel.app";
const DEPLOY_SUFFIX: &str = ".vercel.app";

pub fn cors_layer(config: &Config) -> CorsLayer {
    let production = config.allowed_origin.clone();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request: &Parts| {
                origin
                    .to_str()
                    .is_ok_and(|origin| origin_allowed(origin, production.as_deref()))
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Local dev, any deployment preview under the platform domain, and the
/// configured production origin.
pub fn origin_allowed(origin: &str, production: Option<&str>) -> bool {
    if origin == LOCAL_DEV_ORIGIN || origin == DEPLOY_ROOT {
        return true;
    }
    if let Some(host) = origin.strip_prefix("https://")
        && host.ends_with(DEPLOY_SUFFIX)
        && host.len() > DEPLOY_SUFFIX.len()
        && !host.contains('/')
    {
        return true;
    }
    production.is_some_and(|allowed| allowed == origin)
}
