//! OpenAPI document served by Swagger UI at `/api/docs`.
//!
//! Only operations listed in `paths(...)` show up; each handler still needs
//! its own `#[utoipa::path(...)]`. Generic envelopes (`Page<T>`,
//! `ActionResult<T>`) are collected from the handler bodies.

use utoipa::OpenApi;

// ---- handlers (for `paths(...)`) ----
use crate::handlers::{admin, blog, server, user};

// ---- schemas (for `components(schemas(...))`) ----
use crate::domain::{
    blog::{
        comment::{Comment, CommentDetails},
        post::{Post, PostDetails, PostWithComments},
        tag::{Tag, TagWithCount},
    },
    pagination::PageMeta,
    user::{UserProfile, UserSummary},
};
use crate::dto::{
    requests::{
        admin::{
            admin_update_post_request::AdminUpdatePostRequest,
            admin_update_user_request::AdminUpdateUserRequest,
        },
        blog::{
            create_comment_request::CreateCommentRequest, create_post_request::CreatePostRequest,
            tag_name_request::TagNameRequest, update_post_request::UpdatePostRequest,
        },
        user::{
            login_form::LoginForm, register_request::RegisterRequest,
            update_profile_request::UpdateProfileRequest,
        },
    },
    responses::{
        action_result::Severity,
        admin::{delete_tag_response::DeleteTagResponse, delete_user_response::DeleteUserResponse},
        auth::token_response::TokenResponse,
        blog::{
            delete_comment_response::DeleteCommentResponse,
            delete_post_response::DeletePostResponse,
        },
    },
};
use crate::errors::code_error::CodeErrorResp;
use crate::handlers::{server::healthcheck::ServerHealthcheckResponse, user::logout::LogoutResponse};
use crate::init::state::DeploymentEnvironment;
use crate::services::dashboard_service::DashboardStats;

#[derive(OpenApi)]
#[openapi(
    info(title = "blog-be", description = "Blog publishing backend"),
    paths(
        // --- server ---
        server::healthcheck::healthcheck,

        // --- users ---
        user::register::register,
        user::login::login,
        user::logout::logout,
        user::me::get_me,
        user::me::update_me,

        // --- posts, comments, tags ---
        blog::get_posts::get_posts,
        blog::submit_post::submit_post,
        blog::read_post::read_post,
        blog::update_post::update_post,
        blog::delete_post::delete_post,
        blog::get_comments::get_comments,
        blog::submit_comment::submit_comment,
        blog::delete_comment::delete_comment,
        blog::get_tags::get_tags,
        blog::create_tag::create_tag,

        // --- admin ---
        admin::dashboard::get_dashboard,
        admin::get_users::admin_get_users,
        admin::update_user::admin_update_user,
        admin::delete_user::admin_delete_user,
        admin::profile_picture::upload_profile_picture,
        admin::profile_picture::delete_profile_picture,
        admin::get_posts::admin_get_posts,
        admin::update_post::admin_update_post,
        admin::delete_post::admin_delete_post,
        admin::featured_image::upload_featured_image,
        admin::featured_image::delete_featured_image,
        admin::get_comments::admin_get_comments,
        admin::delete_comment::admin_delete_comment,
        admin::get_tags::admin_get_tags,
        admin::rename_tag::rename_tag,
        admin::delete_tag::delete_tag,
    ),
    components(
        schemas(
            // shared error response
            CodeErrorResp,

            // --- server ---
            ServerHealthcheckResponse,
            DeploymentEnvironment,

            // --- user DTOs ---
            RegisterRequest,
            LoginForm,
            TokenResponse,
            LogoutResponse,
            UpdateProfileRequest,

            // --- blog DTOs ---
            CreatePostRequest,
            UpdatePostRequest,
            CreateCommentRequest,
            TagNameRequest,
            DeletePostResponse,
            DeleteCommentResponse,

            // --- admin DTOs ---
            AdminUpdateUserRequest,
            AdminUpdatePostRequest,
            DeleteUserResponse,
            DeleteTagResponse,
            DashboardStats,
            Severity,

            // --- domain models used in responses ---
            UserProfile,
            UserSummary,
            Post,
            PostDetails,
            PostWithComments,
            Comment,
            CommentDetails,
            Tag,
            TagWithCount,
            PageMeta,
        )
    ),
    tags(
        (name = "server", description = "Health and build info"),
        (name = "users", description = "Registration, login and the caller's profile"),
        (name = "posts", description = "Blog posts"),
        (name = "comments", description = "Comments on posts"),
        (name = "tags", description = "Post tags"),
        (name = "admin", description = "Administration; admin accounts only"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_family_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/healthcheck",
            "/api/v1/login/token",
            "/api/v1/posts/{post_id}",
            "/api/v1/posts/{post_id}/comments",
            "/api/admin/users/{user_id}/profile-picture",
            "/api/admin/tags/{tag_id}",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }
}
