// modules tree
pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/build_info.rs"));
}
pub mod docs;
pub mod schema;
pub mod domain {
    pub mod blog {
        pub mod comment;
        pub mod post;
        pub mod tag;
    }
    pub mod pagination;
    pub mod user;
}
pub mod dto {
    pub mod common {
        pub mod patch_field;
    }
    pub mod requests {
        pub mod admin {
            pub mod admin_update_post_request;
            pub mod admin_update_user_request;
        }
        pub mod blog {
            pub mod create_comment_request;
            pub mod create_post_request;
            pub mod tag_name_request;
            pub mod update_post_request;
        }
        pub mod listing;
        pub mod user {
            pub mod login_form;
            pub mod register_request;
            pub mod update_profile_request;
        }
    }
    pub mod responses {
        pub mod action_result;
        pub mod admin {
            pub mod delete_tag_response;
            pub mod delete_user_response;
        }
        pub mod auth {
            pub mod token_response;
        }
        pub mod blog {
            pub mod delete_comment_response;
            pub mod delete_post_response;
        }
        pub mod response_data;
        pub mod response_meta;
    }
}
pub mod errors {
    pub mod code_error;
}
pub mod handlers {
    pub mod admin {
        pub mod dashboard;
        pub mod delete_comment;
        pub mod delete_post;
        pub mod delete_tag;
        pub mod delete_user;
        pub mod featured_image;
        pub mod get_comments;
        pub mod get_posts;
        pub mod get_tags;
        pub mod get_users;
        pub mod profile_picture;
        pub mod rename_tag;
        pub mod update_post;
        pub mod update_user;
    }
    pub mod blog {
        pub mod create_tag;
        pub mod delete_comment;
        pub mod delete_post;
        pub mod get_comments;
        pub mod get_posts;
        pub mod get_tags;
        pub mod read_post;
        pub mod submit_comment;
        pub mod submit_post;
        pub mod update_post;
    }
    pub mod server {
        pub mod fallback;
        pub mod healthcheck;
    }
    pub mod user {
        pub mod login;
        pub mod logout;
        pub mod me;
        pub mod register;
    }
}
pub mod init {
    pub mod config;
    pub mod logging;
    pub mod server_init;
    pub mod state;
}
pub mod repository;
pub mod routers {
    pub mod main_router;
    pub mod middleware {
        pub mod auth;
        pub mod is_logged_in;
        pub mod is_superuser;
        pub mod logging;
    }
}
pub mod services {
    pub mod comment_service;
    pub mod dashboard_service;
    pub mod error;
    pub mod listing;
    pub mod post_service;
    pub mod tag_service;
    pub mod tx;
    pub mod user_service;
}
pub mod util {
    pub mod auth {
        pub mod access;
        pub mod bearer;
    }
    pub mod crypto {
        pub mod hash_pw;
        pub mod token;
        pub mod verify_pw;
    }
    pub mod extract {
        pub mod upload;
    }
    pub mod file_store;
    pub mod string {
        pub mod validations;
    }
    pub mod time {
        pub mod now;
    }
}
