//! Request gate: route policy table, bearer-token validation, identity extractor.

use axum::{
    extract::{Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{
    authorization::{Authorization, Bearer},
    HeaderMapExt,
};
use chrono::Utc;
use tracing::debug;

use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::handlers::http::AppState;
use crate::models::ROLE_ADMIN;

/// What a route demands from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(&'static str),
}

#[derive(Debug, Clone, Copy)]
enum PathMatch {
    Exact(&'static str),
    /// The path itself and everything below it.
    Subtree(&'static str),
}

impl PathMatch {
    fn matches(&self, path: &str) -> bool {
        match *self {
            PathMatch::Exact(p) => path == p,
            PathMatch::Subtree(p) => {
                path == p || (path.starts_with(p) && path[p.len()..].starts_with('/'))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RouteRule {
    method: Option<&'static str>,
    path: PathMatch,
    access: Access,
}

/// First match wins; unlisted routes require an authenticated identity.
const ROUTE_POLICY: &[RouteRule] = &[
    RouteRule {
        method: Some("POST"),
        path: PathMatch::Exact("/auth/register"),
        access: Access::Public,
    },
    RouteRule {
        method: Some("POST"),
        path: PathMatch::Exact("/auth/login"),
        access: Access::Public,
    },
    RouteRule {
        method: None,
        path: PathMatch::Exact("/health"),
        access: Access::Public,
    },
    RouteRule {
        method: None,
        path: PathMatch::Subtree("/auth/users"),
        access: Access::Role(ROLE_ADMIN),
    },
];

pub fn required_access(method: &str, path: &str) -> Access {
    ROUTE_POLICY
        .iter()
        .find(|rule| {
            rule.method.map_or(true, |m| m.eq_ignore_ascii_case(method)) && rule.path.matches(path)
        })
        .map(|rule| rule.access)
        .unwrap_or(Access::Authenticated)
}

fn bearer_token(headers: &HeaderMap) -> AppResult<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
        .ok_or_else(|| AppError::Auth("Missing or invalid Authorization header".to_string()))
}

/// Middleware: consult the policy table, validate the bearer token when required,
/// and attach the caller's [`Identity`] to the request extensions.
pub async fn request_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let access = required_access(request.method().as_str(), request.uri().path());
    if access == Access::Public {
        return Ok(next.run(request).await);
    }

    let token = bearer_token(request.headers())?;
    let identity = state.jwt_secret().validate(&token, Utc::now())?;

    if let Access::Role(role) = access {
        if !identity.role.eq_ignore_ascii_case(role) {
            debug!(subject = %identity.subject, role = %identity.role, path = %request.uri().path(), "insufficient role");
            return Err(AppError::Forbidden("Insufficient permissions".to_string()));
        }
    }

    debug!(subject = %identity.subject, role = %identity.role, "request authenticated");
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Extractor: identity attached by [`request_gate`].
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or_else(|| AppError::Auth("Authentication required".to_string()))
    }
}
