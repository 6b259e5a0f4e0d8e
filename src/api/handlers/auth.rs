use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::auth::jwt::JwtManager;
use crate::models::{AuthResponse, LoginRequest, SignupRequest, User, UserSummary};
use crate::utils::response::AppError;
use crate::AppState;

/// Register a new account and its (empty) profile.
/// POST /auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    req.validate()?;

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            AppError::internal("Internal server error")
        })?;

    let mut tx = state.db.pool.begin().await.map_err(AppError::from)?;

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (email, username, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, email, username, password_hash, role, created_at, updated_at
        "#,
    )
    .bind(req.email.to_lowercase())
    .bind(&req.username)
    .bind(&password_hash)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::conflict("Email or username already taken")
        }
        _ => AppError::from(e),
    })?;

    sqlx::query("INSERT INTO profiles (user_id, display_name) VALUES ($1, $2)")
        .bind(user.id)
        .bind(&req.username)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("New user registered: {}", user.username);

    issue_token(&state, user)
}

/// Exchange credentials for a JWT.
/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user: Option<User> = sqlx::query_as(
        r#"
        SELECT id, email, username, password_hash, role, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(req.email.to_lowercase())
    .fetch_optional(&state.db.pool)
    .await?;

    let user = user.ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    let valid = bcrypt::verify(&req.password, &user.password_hash).unwrap_or(false);
    if !valid {
        tracing::warn!("Failed login attempt for {}", req.email);
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    tracing::info!("User {} logged in", user.username);

    issue_token(&state, user)
}

fn issue_token(state: &AppState, user: User) -> Result<Json<AuthResponse>, AppError> {
    let jwt_manager = JwtManager::new(&state.config.jwt_secret, state.config.jwt_expiry_seconds);
    let token = jwt_manager.generate_token(user.id, user.role).map_err(|e| {
        tracing::error!("Failed to generate JWT: {}", e);
        AppError::internal("Internal server error")
    })?;

    let expires_at = chrono::Utc::now().timestamp() + state.config.jwt_expiry_seconds as i64;

    Ok(Json(AuthResponse {
        token,
        expires_at,
        user: UserSummary::from(user),
    }))
}
