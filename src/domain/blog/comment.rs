use chrono::{DateTime, Utc};
use diesel::{Queryable, Selectable, prelude::Insertable};
use serde_derive::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{domain::user::UserSummary, schema::comments};

pub const COMMENT_MAX_CHARS: usize = 500;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, ToSchema)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub comment_id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub comment_content: String,
    pub comment_created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment<'a> {
    pub comment_id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub comment_content: &'a str,
    pub comment_created_at: DateTime<Utc>,
}

impl<'a> NewComment<'a> {
    pub fn new(post_id: Uuid, user_id: Uuid, comment_content: &'a str) -> Self {
        Self {
            comment_id: Uuid::now_v7(),
            post_id,
            user_id,
            comment_content,
            comment_created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentDetails {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Option<UserSummary>,
}
