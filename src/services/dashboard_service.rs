use serde_derive::Serialize;
use utoipa::ToSchema;

use crate::repository::{BlogStore, CommentQuery, PostQuery, TagQuery, UserQuery};

use super::{
    error::{ServiceError, ServiceResult},
    tx::finish,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_posts: i64,
    pub total_comments: i64,
    pub total_tags: i64,
}

pub async fn dashboard(store: &dyn BlogStore) -> ServiceResult<DashboardStats> {
    let mut tx = store.begin().await?;
    let result = async {
        Ok::<_, ServiceError>(DashboardStats {
            total_users: tx.count_users(&UserQuery::default()).await?,
            total_posts: tx.count_posts(&PostQuery::default()).await?,
            total_comments: tx.count_comments(&CommentQuery::default()).await?,
            total_tags: tx.count_tags(&TagQuery::default()).await?,
        })
    }
    .await;
    finish(tx, result).await
}
