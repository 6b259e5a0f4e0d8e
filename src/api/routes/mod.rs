use axum::{
    http::{header, HeaderName, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers;
use crate::auth::middleware::{admin_middleware, auth_middleware};
use crate::auth::rate_limit::{rate_limit_middleware, RateLimiterState};
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let auth_limiter = RateLimiterState::auth(state.config.auth_rate_limit_per_minute);

    // Auth endpoints sit behind the sliding-window limiter.
    let auth_routes = Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .layer(axum_middleware::from_fn_with_state(
            auth_limiter,
            rate_limit_middleware,
        ));

    // The order proxy carries the CORS contract external callers rely
    // on; the preflight OPTIONS is answered by the layer itself.
    let payment_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ]);

    let payment_routes = Router::new()
        .route("/payments/orders", post(handlers::payments::create_order))
        .layer(payment_cors);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/cards", get(handlers::feed::list_cards))
        .route("/cards/:card_id", get(handlers::cards::get_card))
        .route("/cards/:card_id/view", post(handlers::cards::record_view))
        .route("/cards/:card_id/rating", get(handlers::interactions::get_rating))
        .route("/offers", get(handlers::offers::list_offers))
        .route("/templates", get(handlers::cards::list_templates));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Account
        .route("/account/profile", get(handlers::account::get_profile))
        .route("/account/profile", put(handlers::account::update_profile))
        .route("/account/cards", get(handlers::account::my_cards))
        .route("/account/saved", get(handlers::account::saved_cards))
        .route("/account/offers", get(handlers::account::my_offers))
        // Cards
        .route("/cards", post(handlers::cards::create_card))
        .route("/cards/:card_id", put(handlers::cards::update_card))
        .route("/cards/:card_id", delete(handlers::cards::delete_card))
        // Interactions
        .route("/cards/:card_id/like", post(handlers::interactions::toggle_like))
        .route("/cards/:card_id/save", post(handlers::interactions::toggle_save))
        .route("/cards/:card_id/rating", put(handlers::interactions::rate_card))
        .route(
            "/cards/:card_id/interactions",
            get(handlers::interactions::get_interactions),
        )
        // Offers
        .route("/offers", post(handlers::offers::create_offer))
        .route("/offers/:offer_id", delete(handlers::offers::delete_offer))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Admin routes (auth + admin role)
    let admin_routes = Router::new()
        .route("/admin/users", get(handlers::admin::list_users))
        .route("/admin/users/:user_id", delete(handlers::admin::delete_user))
        .route("/admin/users/:user_id/verify", post(handlers::admin::verify_user))
        .route("/admin/users/:user_id/premium", post(handlers::admin::grant_premium))
        .route("/admin/cards", get(handlers::admin::list_cards))
        .route("/admin/cards/:card_id", delete(handlers::admin::delete_card))
        .route("/admin/ads", get(handlers::admin::list_ads))
        .route("/admin/ads", post(handlers::admin::create_ad))
        .route("/admin/ads/:ad_id", put(handlers::admin::update_ad))
        .route("/admin/ads/:ad_id", delete(handlers::admin::delete_ad))
        .layer(axum_middleware::from_fn(admin_middleware))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(auth_routes)
        .merge(payment_routes)
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
}
