//! PostgreSQL adapter for the blog storage port, on diesel-async and bb8.

use async_trait::async_trait;
use diesel::{
    BoolExpressionMethods, EscapeExpressionMethods, ExpressionMethods, OptionalExtension,
    PgTextExpressionMethods, QueryDsl, SelectableHelper,
    pg::Pg,
    result::{DatabaseErrorKind, Error as DieselError},
    sql_types::{BigInt, Nullable, Text},
};
use diesel_async::{
    AnsiTransactionManager, AsyncPgConnection, RunQueryDsl, TransactionManager,
    pooled_connection::bb8::{Pool, PooledConnection},
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    domain::{
        blog::{
            comment::{Comment, NewComment},
            post::{NewPost, NewPostTag, Post, PostChangeset},
            tag::{NewTag, Tag, TagWithCount},
        },
        user::{User, UserChangeset, UserInsertable},
    },
    schema::{comments, post_tags, posts, tags, users},
};

use super::{
    BlogStore, BlogTx, CommentQuery, PageWindow, PostQuery, StoreError, StoreResult, TagQuery,
    UserQuery,
};

const TAGS_WITH_COUNTS_SQL: &str = "\
SELECT t.tag_id, t.tag_name, COALESCE(c.post_count, 0) AS post_count \
FROM tags t \
LEFT OUTER JOIN ( \
    SELECT pt.tag_id, COUNT(pt.post_id) AS post_count \
    FROM post_tags pt \
    GROUP BY pt.tag_id \
) c ON c.tag_id = t.tag_id \
WHERE ($1::text IS NULL OR t.tag_name ILIKE $1 ESCAPE '\\') \
ORDER BY t.tag_name ASC, t.tag_id ASC \
OFFSET $2 LIMIT $3";

#[derive(Clone)]
pub struct PgBlogStore {
    pool: Pool<AsyncPgConnection>,
}

impl PgBlogStore {
    pub fn new(pool: Pool<AsyncPgConnection>) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: DieselError) -> StoreError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreError::unique_violation(info.constraint_name().unwrap_or("unknown"))
        }
        other => {
            let error_message = other.to_string();
            debug!(%error_message, "diesel operation failed");
            StoreError::query(error_message)
        }
    }
}

/// Substring pattern for `ILIKE ... ESCAPE '\'`. Wildcards in `term` match literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn filtered_users(query: &UserQuery) -> users::BoxedQuery<'static, Pg> {
    let mut q = users::table.into_boxed();
    if let Some(term) = &query.search {
        let pattern = like_pattern(term);
        q = q.filter(
            users::user_name
                .ilike(pattern.clone())
                .escape('\\')
                .or(users::user_email.ilike(pattern).escape('\\')),
        );
    }
    q
}

/// Shared by the page fetch and the count so both agree on which rows qualify.
fn filtered_posts(query: &PostQuery) -> posts::BoxedQuery<'static, Pg> {
    let mut q = posts::table.into_boxed();
    if let Some(term) = &query.search {
        let pattern = like_pattern(term);
        q = q.filter(
            posts::post_title
                .ilike(pattern.clone())
                .escape('\\')
                .or(posts::post_content.ilike(pattern).escape('\\')),
        );
    }
    if let Some(owner_id) = query.owner_id {
        q = q.filter(posts::user_id.eq(owner_id));
    }
    if !query.tags.is_empty() {
        // IN (subquery) is a membership test, so a post carrying several of
        // the requested tags still appears once.
        let tagged_post_ids = post_tags::table
            .inner_join(tags::table)
            .filter(tags::tag_name.eq_any(query.tags.clone()))
            .select(post_tags::post_id);
        q = q.filter(posts::post_id.eq_any(tagged_post_ids));
    }
    q
}

fn filtered_comments(query: &CommentQuery) -> comments::BoxedQuery<'static, Pg> {
    let mut q = comments::table.into_boxed();
    if let Some(term) = &query.search {
        q = q.filter(comments::comment_content.ilike(like_pattern(term)).escape('\\'));
    }
    if let Some(owner_id) = query.owner_id {
        q = q.filter(comments::user_id.eq(owner_id));
    }
    if let Some(post_id) = query.post_id {
        q = q.filter(comments::post_id.eq(post_id));
    }
    q
}

fn filtered_tags(query: &TagQuery) -> tags::BoxedQuery<'static, Pg> {
    let mut q = tags::table.into_boxed();
    if let Some(term) = &query.search {
        q = q.filter(tags::tag_name.ilike(like_pattern(term)).escape('\\'));
    }
    q
}

#[async_trait]
impl BlogStore for PgBlogStore {
    async fn begin(&self) -> StoreResult<Box<dyn BlogTx>> {
        let mut conn = self
            .pool
            .get_owned()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;
        AnsiTransactionManager::begin_transaction(&mut *conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Box::new(PgTx { conn }))
    }
}

pub struct PgTx {
    conn: PooledConnection<'static, AsyncPgConnection>,
}

#[async_trait]
impl BlogTx for PgTx {
    async fn insert_user(&mut self, user: &UserInsertable<'_>) -> StoreResult<User> {
        diesel::insert_into(users::table)
            .values(user)
            .returning(User::as_returning())
            .get_result(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn find_user(&mut self, user_id: Uuid) -> StoreResult<Option<User>> {
        users::table
            .find(user_id)
            .select(User::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn find_user_by_name(&mut self, user_name: &str) -> StoreResult<Option<User>> {
        users::table
            .filter(users::user_name.eq(user_name))
            .select(User::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn find_user_by_email(&mut self, user_email: &str) -> StoreResult<Option<User>> {
        users::table
            .filter(users::user_email.eq(user_email))
            .select(User::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn update_user(
        &mut self,
        user_id: Uuid,
        changes: &UserChangeset,
    ) -> StoreResult<Option<User>> {
        if changes.is_empty() {
            return self.find_user(user_id).await;
        }
        diesel::update(users::table.find(user_id))
            .set(changes)
            .returning(User::as_returning())
            .get_result(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn delete_user(&mut self, user_id: Uuid) -> StoreResult<bool> {
        diesel::delete(users::table.find(user_id))
            .execute(&mut *self.conn)
            .await
            .map(|deleted| deleted > 0)
            .map_err(map_diesel_error)
    }

    async fn users_by_ids(&mut self, user_ids: &[Uuid]) -> StoreResult<Vec<User>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        users::table
            .filter(users::user_id.eq_any(user_ids.to_vec()))
            .select(User::as_select())
            .load(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list_users(
        &mut self,
        query: &UserQuery,
        window: PageWindow,
    ) -> StoreResult<Vec<User>> {
        filtered_users(query)
            .order((users::user_created_at.asc(), users::user_id.asc()))
            .offset(window.offset)
            .limit(window.limit)
            .select(User::as_select())
            .load(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count_users(&mut self, query: &UserQuery) -> StoreResult<i64> {
        filtered_users(query)
            .count()
            .get_result(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert_post(&mut self, post: &NewPost<'_>) -> StoreResult<Post> {
        diesel::insert_into(posts::table)
            .values(post)
            .returning(Post::as_returning())
            .get_result(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn find_post(&mut self, post_id: Uuid) -> StoreResult<Option<Post>> {
        posts::table
            .find(post_id)
            .select(Post::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn update_post(
        &mut self,
        post_id: Uuid,
        changes: &PostChangeset,
    ) -> StoreResult<Option<Post>> {
        if changes.is_empty() {
            return self.find_post(post_id).await;
        }
        diesel::update(posts::table.find(post_id))
            .set(changes)
            .returning(Post::as_returning())
            .get_result(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn delete_post(&mut self, post_id: Uuid) -> StoreResult<bool> {
        diesel::delete(posts::table.find(post_id))
            .execute(&mut *self.conn)
            .await
            .map(|deleted| deleted > 0)
            .map_err(map_diesel_error)
    }

    async fn clear_post_owner(&mut self, user_id: Uuid) -> StoreResult<usize> {
        diesel::update(posts::table.filter(posts::user_id.eq(user_id)))
            .set(posts::user_id.eq(None::<Uuid>))
            .execute(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list_posts(
        &mut self,
        query: &PostQuery,
        window: PageWindow,
    ) -> StoreResult<Vec<Post>> {
        filtered_posts(query)
            .order((posts::post_created_at.desc(), posts::post_id.desc()))
            .offset(window.offset)
            .limit(window.limit)
            .select(Post::as_select())
            .load(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count_posts(&mut self, query: &PostQuery) -> StoreResult<i64> {
        filtered_posts(query)
            .count()
            .get_result(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn link_tag(&mut self, post_id: Uuid, tag_id: i32) -> StoreResult<()> {
        diesel::insert_into(post_tags::table)
            .values(NewPostTag { post_id, tag_id })
            .on_conflict_do_nothing()
            .execute(&mut *self.conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn clear_post_tags(&mut self, post_id: Uuid) -> StoreResult<usize> {
        diesel::delete(post_tags::table.filter(post_tags::post_id.eq(post_id)))
            .execute(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn clear_tag_links(&mut self, tag_id: i32) -> StoreResult<usize> {
        diesel::delete(post_tags::table.filter(post_tags::tag_id.eq(tag_id)))
            .execute(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn tags_for_posts(&mut self, post_ids: &[Uuid]) -> StoreResult<Vec<(Uuid, Tag)>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        post_tags::table
            .inner_join(tags::table)
            .filter(post_tags::post_id.eq_any(post_ids.to_vec()))
            .order(tags::tag_name.asc())
            .select((post_tags::post_id, Tag::as_select()))
            .load(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn find_tag(&mut self, tag_id: i32) -> StoreResult<Option<Tag>> {
        tags::table
            .find(tag_id)
            .select(Tag::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn find_tag_by_name(&mut self, tag_name: &str) -> StoreResult<Option<Tag>> {
        tags::table
            .filter(tags::tag_name.eq(tag_name))
            .select(Tag::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn insert_tag(&mut self, tag_name: &str) -> StoreResult<Tag> {
        // DO NOTHING keeps the transaction usable when a concurrent writer
        // already created the row.
        let inserted = diesel::insert_into(tags::table)
            .values(NewTag::new(tag_name))
            .on_conflict(tags::tag_name)
            .do_nothing()
            .returning(Tag::as_returning())
            .get_result(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        inserted.ok_or_else(|| StoreError::unique_violation("tags_tag_name_key"))
    }

    async fn rename_tag(&mut self, tag_id: i32, tag_name: &str) -> StoreResult<Option<Tag>> {
        diesel::update(tags::table.find(tag_id))
            .set(tags::tag_name.eq(tag_name))
            .returning(Tag::as_returning())
            .get_result(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn delete_tag(&mut self, tag_id: i32) -> StoreResult<bool> {
        diesel::delete(tags::table.find(tag_id))
            .execute(&mut *self.conn)
            .await
            .map(|deleted| deleted > 0)
            .map_err(map_diesel_error)
    }

    async fn list_tags(&mut self, window: PageWindow) -> StoreResult<Vec<Tag>> {
        tags::table
            .order((tags::tag_name.asc(), tags::tag_id.asc()))
            .offset(window.offset)
            .limit(window.limit)
            .select(Tag::as_select())
            .load(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list_tags_with_counts(
        &mut self,
        query: &TagQuery,
        window: PageWindow,
    ) -> StoreResult<Vec<TagWithCount>> {
        diesel::sql_query(TAGS_WITH_COUNTS_SQL)
            .bind::<Nullable<Text>, _>(query.search.as_deref().map(like_pattern))
            .bind::<BigInt, _>(window.offset)
            .bind::<BigInt, _>(window.limit)
            .load(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count_tags(&mut self, query: &TagQuery) -> StoreResult<i64> {
        filtered_tags(query)
            .count()
            .get_result(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert_comment(&mut self, comment: &NewComment<'_>) -> StoreResult<Comment> {
        diesel::insert_into(comments::table)
            .values(comment)
            .returning(Comment::as_returning())
            .get_result(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn find_comment(&mut self, comment_id: Uuid) -> StoreResult<Option<Comment>> {
        comments::table
            .find(comment_id)
            .select(Comment::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn delete_comment(&mut self, comment_id: Uuid) -> StoreResult<bool> {
        diesel::delete(comments::table.find(comment_id))
            .execute(&mut *self.conn)
            .await
            .map(|deleted| deleted > 0)
            .map_err(map_diesel_error)
    }

    async fn delete_post_comments(&mut self, post_id: Uuid) -> StoreResult<usize> {
        diesel::delete(comments::table.filter(comments::post_id.eq(post_id)))
            .execute(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn delete_user_comments(&mut self, user_id: Uuid) -> StoreResult<usize> {
        diesel::delete(comments::table.filter(comments::user_id.eq(user_id)))
            .execute(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list_comments(
        &mut self,
        query: &CommentQuery,
        window: PageWindow,
    ) -> StoreResult<Vec<Comment>> {
        filtered_comments(query)
            .order((comments::comment_created_at.desc(), comments::comment_id.desc()))
            .offset(window.offset)
            .limit(window.limit)
            .select(Comment::as_select())
            .load(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count_comments(&mut self, query: &CommentQuery) -> StoreResult<i64> {
        filtered_comments(query)
            .count()
            .get_result(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn commit(mut self: Box<Self>) -> StoreResult<()> {
        AnsiTransactionManager::commit_transaction(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn rollback(mut self: Box<Self>) -> StoreResult<()> {
        AnsiTransactionManager::rollback_transaction(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("rust", "%rust%")]
    #[case("50%", "%50\\%%")]
    #[case("snake_case", "%snake\\_case%")]
    #[case("C:\\dir", "%C:\\\\dir%")]
    fn search_terms_match_literally(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(term), expected);
    }
}
