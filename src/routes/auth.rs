/**
 * Authentication Routes
 * bcrypt credential check, JWT issuance, and the bearer guard for admin routes
 */
use axum::{
    extract::{rejection::JsonRejection, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db::{self, models::PublicUser, storage};
use crate::error::ApiError;
use crate::routes::MessageResponse;

// ============================================================================
// Configuration
// ============================================================================

lazy_static::lazy_static! {
    /// JWT secret key from environment
    pub static ref JWT_SECRET: String = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "default-jwt-secret-change-in-production".to_string());

    /// Token lifetime in hours (24 unless overridden)
    static ref TOKEN_EXPIRY_HOURS: i64 = std::env::var("JWT_EXPIRY_HOURS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(24);

    /// Admin username from environment
    pub static ref ADMIN_USERNAME: String = std::env::var("ADMIN_USERNAME")
        .unwrap_or_else(|_| "admin".to_string());

    /// Admin password hash from environment (or plain password to hash)
    pub static ref ADMIN_PASSWORD_HASH: String = {
        if let Ok(hashed) = std::env::var("ADMIN_PASSWORD_HASH") {
            hashed
        } else if let Ok(plain) = std::env::var("ADMIN_PASSWORD") {
            hash(&plain, DEFAULT_COST).unwrap_or_else(|_| "".to_string())
        } else {
            // Default password "password" hashed
            hash("password", DEFAULT_COST).unwrap_or_else(|_| "".to_string())
        }
    };
}

// ============================================================================
// Types
// ============================================================================

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i32,         // User ID
    pub username: String, // Username echoed back by /api/profile
    pub exp: i64,         // Expiry timestamp
    pub iat: i64,         // Issued at timestamp
}

/// Verified identity injected into request extensions by [`require_admin`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Create access token
pub fn create_access_token(
    user_id: i32,
    username: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::hours(*TOKEN_EXPIRY_HOURS);

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
}

/// Verify and decode access token (signature and expiry)
pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(JWT_SECRET.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

// ============================================================================
// Middleware
// ============================================================================

/// Gate for the admin surface. Missing and invalid/expired tokens are both
/// rejected with 401 so callers cannot distinguish token state.
pub async fn require_admin(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())
        .ok_or_else(|| ApiError::Unauthorized("Authorization required".to_string()))?;

    let claims = verify_access_token(&token)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/login (alias: /api/login)
/// Check credentials and return a bearer token plus the public user shape.
pub async fn login(
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    // Authenticate against the users table; fall back to the env-var admin
    // account when running without a database (local dev, degraded mode).
    let user: PublicUser = match db::get_pool() {
        Some(pool) => {
            let found = storage::get_user_by_username(pool.as_ref(), &payload.username).await?;

            // Unknown usernames and wrong passwords must be indistinguishable.
            let Some(user) = found else {
                tracing::warn!("Login attempt for unknown user");
                return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
            };

            // bcrypt is CPU-bound; keep the async executor free.
            let password = payload.password.clone();
            let password_hash = user.password_hash.clone();
            let password_ok = tokio::task::spawn_blocking(move || {
                verify(&password, &password_hash).unwrap_or(false)
            })
            .await
            .unwrap_or(false);

            if !password_ok {
                tracing::warn!("Failed login attempt for user: {}", user.username);
                return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
            }

            PublicUser::from(user)
        }
        None => {
            let username_ok = payload.username.eq_ignore_ascii_case(&ADMIN_USERNAME);
            let password = payload.password.clone();
            let password_ok = tokio::task::spawn_blocking(move || {
                verify(&password, &ADMIN_PASSWORD_HASH).unwrap_or(false)
            })
            .await
            .unwrap_or(false);

            if !username_ok || !password_ok {
                return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
            }

            // Mirrors the id the seeded admin gets as the first row.
            PublicUser {
                id: 1,
                username: ADMIN_USERNAME.clone(),
            }
        }
    };

    let token = create_access_token(user.id, &user.username)
        .map_err(|e| ApiError::Internal(format!("Failed to create access token: {}", e)))?;

    tracing::info!("Successful login for user: {}", user.username);

    Ok(Json(LoginResponse { token, user }))
}

/// POST /api/auth/logout (alias: /api/logout)
/// Tokens are stateless and stay valid until expiry; this is an acknowledgment.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
}

/// GET /api/profile
/// Return the identity verified by the bearer guard.
pub async fn profile(Extension(user): Extension<AuthUser>) -> Json<PublicUser> {
    Json(PublicUser {
        id: user.id,
        username: user.username,
    })
}

// ============================================================================
// Seeding
// ============================================================================

/// Create the admin account on first boot when the users table is empty.
/// Credentials come from ADMIN_USERNAME plus ADMIN_PASSWORD_HASH (or
/// ADMIN_PASSWORD, hashed at startup).
pub async fn seed_admin_user(pool: &PgPool) -> Result<(), sqlx::Error> {
    if storage::count_users(pool).await? > 0 {
        return Ok(());
    }

    if ADMIN_PASSWORD_HASH.is_empty() {
        tracing::warn!("No usable admin password hash; skipping admin account seed");
        return Ok(());
    }

    let user = storage::create_user(pool, &ADMIN_USERNAME, &ADMIN_PASSWORD_HASH).await?;
    tracing::info!("Seeded admin account '{}' (id {})", user.username, user.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::routing::{get, post};
    use axum::Router;
    use tower::ServiceExt;

    fn auth_router() -> Router {
        let gated = Router::new()
            .route("/api/profile", get(profile))
            .layer(axum::middleware::from_fn(require_admin));
        Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/logout", post(logout))
            .merge(gated)
    }

    async fn post_json(
        app: Router,
        uri: &str,
        json: &impl serde::Serialize,
    ) -> (StatusCode, axum::body::Bytes) {
        let body = Body::from(serde_json::to_vec(json).unwrap());
        let req = HttpRequest::post(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes)
    }

    async fn get_with_token(
        app: Router,
        uri: &str,
        token: Option<&str>,
    ) -> (StatusCode, axum::body::Bytes) {
        let mut builder = HttpRequest::get(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let req = builder.body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes)
    }

    #[test]
    fn test_token_round_trip() {
        let token = create_access_token(7, "admin").unwrap();
        let claims = verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_access_token_invalid_returns_err() {
        assert!(verify_access_token("invalid.jwt.token").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: 1,
            username: "admin".to_string(),
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(26)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_access_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc123".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc123"));

        let mut basic = HeaderMap::new();
        basic.insert("authorization", "Basic abc123".parse().unwrap());
        assert!(extract_bearer_token(&basic).is_none());

        assert!(extract_bearer_token(&HeaderMap::new()).is_none());
    }

    #[tokio::test]
    async fn test_login_empty_username_returns_bad_request() {
        let (status, _) = post_json(
            auth_router(),
            "/api/auth/login",
            &LoginRequest {
                username: "".to_string(),
                password: "password".to_string(),
            },
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_missing_field_returns_bad_request() {
        let (status, _) = post_json(
            auth_router(),
            "/api/auth/login",
            &serde_json::json!({ "username": "admin" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_fail_identically() {
        let (status_unknown, body_unknown) = post_json(
            auth_router(),
            "/api/auth/login",
            &LoginRequest {
                username: "nobody".to_string(),
                password: "password123".to_string(),
            },
        )
        .await;
        let (status_wrong, body_wrong) = post_json(
            auth_router(),
            "/api/auth/login",
            &LoginRequest {
                username: "admin".to_string(),
                password: "password123".to_string(),
            },
        )
        .await;

        assert_eq!(status_unknown, StatusCode::UNAUTHORIZED);
        assert_eq!(status_wrong, StatusCode::UNAUTHORIZED);
        assert_eq!(body_unknown, body_wrong);
    }

    #[tokio::test]
    async fn test_login_success_then_profile_round_trips() {
        let (status, bytes) = post_json(
            auth_router(),
            "/api/auth/login",
            &LoginRequest {
                username: "admin".to_string(),
                password: "password".to_string(),
            },
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body: LoginResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.token.is_empty());
        assert_eq!(body.user.username, "admin");

        let (status, bytes) =
            get_with_token(auth_router(), "/api/profile", Some(&body.token)).await;
        assert_eq!(status, StatusCode::OK);
        let me: PublicUser = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(me.username, "admin");
    }

    #[tokio::test]
    async fn test_profile_rejects_missing_and_garbage_tokens() {
        let (status, _) = get_with_token(auth_router(), "/api/profile", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) =
            get_with_token(auth_router(), "/api/profile", Some("garbage.token.here")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_returns_message() {
        let req = HttpRequest::post("/api/auth/logout")
            .body(Body::empty())
            .unwrap();
        let res = auth_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: MessageResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, "Logged out successfully");
    }
}
