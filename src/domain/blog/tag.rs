use std::collections::HashSet;

use diesel::{Queryable, QueryableByName, Selectable, prelude::Insertable};
use serde_derive::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::schema::tags;

pub const TAG_NAME_MAX_CHARS: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, ToSchema)]
#[diesel(table_name = tags)]
pub struct Tag {
    pub tag_id: i32,
    pub tag_name: String,
}

#[derive(Insertable)]
#[diesel(table_name = tags)]
pub struct NewTag<'a> {
    pub tag_name: &'a str,
}

impl<'a> NewTag<'a> {
    pub fn new(tag_name: &'a str) -> Self {
        Self { tag_name }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, QueryableByName, ToSchema)]
pub struct TagWithCount {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    pub tag_id: i32,
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub tag_name: String,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub post_count: i64,
}

/// Canonical form of a tag name: trimmed and lower-cased.
/// Returns `None` when nothing is left after trimming.
pub fn normalize_tag_name(raw: &str) -> Option<String> {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Length is measured on the normalized form, which is what gets stored.
pub fn tag_name_fits(normalized: &str) -> bool {
    normalized.chars().count() <= TAG_NAME_MAX_CHARS
}

/// Normalizes every entry, drops blanks and keeps the first occurrence of each name.
pub fn normalize_tag_list<S: AsRef<str>>(raws: &[S]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    raws.iter()
        .filter_map(|raw| normalize_tag_name(raw.as_ref()))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
