use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Queryable, Selectable, prelude::Insertable};
use serde_derive::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{
        blog::{comment::CommentDetails, tag::Tag},
        user::UserSummary,
    },
    schema::{post_tags, posts},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, ToSchema)]
#[diesel(table_name = posts)]
pub struct Post {
    pub post_id: Uuid,
    /// `None` once the author's account has been removed.
    pub user_id: Option<Uuid>,
    pub post_title: String,
    pub post_content: String,
    pub post_featured_image_url: Option<String>,
    pub post_created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost<'a> {
    pub post_id: Uuid,
    pub user_id: Option<Uuid>,
    pub post_title: &'a str,
    pub post_content: &'a str,
    pub post_featured_image_url: Option<&'a str>,
    pub post_created_at: DateTime<Utc>,
}

impl<'a> NewPost<'a> {
    pub fn new(
        user_id: Uuid,
        post_title: &'a str,
        post_content: &'a str,
        post_featured_image_url: Option<&'a str>,
    ) -> Self {
        Self {
            post_id: Uuid::now_v7(),
            user_id: Some(user_id),
            post_title,
            post_content,
            post_featured_image_url,
            post_created_at: Utc::now(),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = post_tags)]
pub struct NewPostTag {
    pub post_id: Uuid,
    pub tag_id: i32,
}

#[derive(Clone, Debug, Default)]
pub struct PostInput {
    pub post_title: String,
    pub post_content: String,
    pub post_featured_image_url: Option<String>,
    pub post_tags: Vec<String>,
}

/// Partial update of a post. Only supplied fields change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub post_title: Option<String>,
    pub post_content: Option<String>,
    pub post_featured_image_url: Option<Option<String>>,
}

/// Admin edit: a post patch plus optional full replacement of the tag set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminPostPatch {
    pub patch: PostPatch,
    pub post_tags: Option<Vec<String>>,
}

#[derive(AsChangeset, Clone, Debug, Default, PartialEq, Eq)]
#[diesel(table_name = posts)]
pub struct PostChangeset {
    pub post_title: Option<String>,
    pub post_content: Option<String>,
    pub post_featured_image_url: Option<Option<String>>,
}

impl PostChangeset {
    pub fn is_empty(&self) -> bool {
        *self == PostChangeset::default()
    }

    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.post_title {
            post.post_title = title.clone();
        }
        if let Some(content) = &self.post_content {
            post.post_content = content.clone();
        }
        if let Some(url) = &self.post_featured_image_url {
            post.post_featured_image_url = url.clone();
        }
    }
}

impl From<PostPatch> for PostChangeset {
    fn from(patch: PostPatch) -> Self {
        PostChangeset {
            post_title: patch.post_title,
            post_content: patch.post_content,
            post_featured_image_url: patch.post_featured_image_url,
        }
    }
}

/// A post together with its author badge and tag list.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PostDetails {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<UserSummary>,
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PostWithComments {
    #[serde(flatten)]
    pub details: PostDetails,
    pub comments: Vec<CommentDetails>,
}
