use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post, put},
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::ApiDoc,
    handlers::{
        admin::{
            dashboard::get_dashboard,
            delete_comment::admin_delete_comment,
            delete_post::admin_delete_post,
            delete_tag::delete_tag,
            delete_user::admin_delete_user,
            featured_image::{delete_featured_image, upload_featured_image},
            get_comments::admin_get_comments,
            get_posts::admin_get_posts,
            get_tags::admin_get_tags,
            get_users::admin_get_users,
            profile_picture::{delete_profile_picture, upload_profile_picture},
            rename_tag::rename_tag,
            update_post::admin_update_post,
            update_user::admin_update_user,
        },
        blog::{
            create_tag::create_tag, delete_comment::delete_comment, delete_post::delete_post,
            get_comments::get_comments, get_posts::get_posts, get_tags::get_tags,
            read_post::read_post, submit_comment::submit_comment, submit_post::submit_post,
            update_post::update_post,
        },
        server::{fallback::fallback_handler, healthcheck::healthcheck},
        user::{
            login::login,
            logout::logout,
            me::{get_me, update_me},
            register::register,
        },
    },
    init::state::ServerState,
};

use super::middleware::{
    auth::auth_middleware, is_logged_in::is_logged_in_middleware,
    is_superuser::is_superuser_middleware, logging::log_middleware,
};

// uploads top out at 2MB; leave room for multipart framing
const MAX_REQUEST_SIZE: usize = 1024 * 1024 * 4;

pub fn build_router(state: Arc<ServerState>) -> Router {
    let auth_middleware = from_fn_with_state(state.clone(), auth_middleware);
    let log_middleware = from_fn_with_state(state.clone(), log_middleware);
    let compression_middleware = CompressionLayer::new().gzip(true).zstd(true);
    let cors_layer = CorsLayer::very_permissive();

    // Anyone; handlers that care read the `AuthStatus` extension
    let public_router = Router::new()
        .route("/api/healthcheck", get(healthcheck))
        .route("/api/v1/users/register", post(register))
        .route("/api/v1/login/token", post(login))
        .route("/api/v1/logout", post(logout))
        .route("/api/v1/posts", get(get_posts))
        .route("/api/v1/posts/{post_id}", get(read_post))
        .route("/api/v1/posts/{post_id}/comments", get(get_comments))
        .route("/api/v1/tags", get(get_tags));

    // Active users
    let protected_router = Router::new()
        .route("/api/v1/users/me", get(get_me).patch(update_me))
        .route("/api/v1/posts", post(submit_post))
        .route(
            "/api/v1/posts/{post_id}",
            put(update_post).delete(delete_post),
        )
        .route("/api/v1/posts/{post_id}/comments", post(submit_comment))
        .route("/api/v1/comments/{comment_id}", delete(delete_comment))
        .route("/api/v1/tags", post(create_tag))
        .route_layer(from_fn(is_logged_in_middleware));

    // Active admins
    let admin_router = Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/users", get(admin_get_users))
        .route(
            "/users/{user_id}",
            patch(admin_update_user).delete(admin_delete_user),
        )
        .route(
            "/users/{user_id}/profile-picture",
            post(upload_profile_picture).delete(delete_profile_picture),
        )
        .route("/posts", get(admin_get_posts))
        .route(
            "/posts/{post_id}",
            patch(admin_update_post).delete(admin_delete_post),
        )
        .route(
            "/posts/{post_id}/featured-image",
            post(upload_featured_image).delete(delete_featured_image),
        )
        .route("/comments", get(admin_get_comments))
        .route("/comments/{comment_id}", delete(admin_delete_comment))
        .route("/tags", get(admin_get_tags))
        .route("/tags/{tag_id}", patch(rename_tag).delete(delete_tag))
        .route_layer(from_fn(is_superuser_middleware));

    Router::new()
        .merge(public_router)
        .merge(protected_router)
        .nest("/api/admin", admin_router)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .nest_service("/static", ServeDir::new(state.config().static_dir.clone()))
        .fallback(fallback_handler)
        .layer(auth_middleware)
        .layer(compression_middleware)
        .layer(log_middleware)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_SIZE))
        .layer(cors_layer)
        .with_state(state)
}
