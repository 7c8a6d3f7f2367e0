//! Query identity and invalidation labels.
//!
//! A `QueryKey` is the normalized identity of a read request; two requests
//! whose parameters normalize identically share one cache entry. A `Tag` is
//! the label mutations use to batch-invalidate every entry they affect.

use serde::{Deserialize, Serialize};

use crate::constants::paging::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Cuisine,
    Difficulty,
    Rating,
    CaloriesPerServing,
}

impl SortField {
    #[must_use]
    pub const fn as_query_value(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Cuisine => "cuisine",
            Self::Difficulty => "difficulty",
            Self::Rating => "rating",
            Self::CaloriesPerServing => "caloriesPerServing",
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query_value())
    }
}

impl SortOrder {
    #[must_use]
    pub const fn as_query_value(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Parameters of a recipe listing query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListParams {
    pub skip: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            sort_by: SortField::Name,
            order: SortOrder::Asc,
        }
    }
}

impl ListParams {
    /// Canonical form: search terms are trimmed and an empty term is no term
    /// at all, so `""` and absence hit the same cache entry.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }
}

/// Normalized identity of a read request, the unit of caching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    RecipeList(ListParams),
    Recipe(i64),
}

impl QueryKey {
    /// The tag this query's cache entry always carries, independent of any
    /// payload: listings carry the collection tag, single items their own.
    /// Entries are labeled with it from the moment a fetch is issued, so an
    /// invalidation reaches an entry that has never loaded.
    #[must_use]
    pub const fn tag(&self) -> Tag {
        match self {
            Self::RecipeList(_) => Tag::RecipeList,
            Self::Recipe(id) => Tag::Recipe(*id),
        }
    }

    /// Path and query string for the request this key stands for,
    /// relative to the API base.
    #[must_use]
    pub fn request_path(&self) -> String {
        match self {
            Self::RecipeList(params) => {
                let mut path = format!("/recipes?skip={}&limit={}", params.skip, params.limit);
                if let Some(search) = &params.search {
                    path.push_str("&q=");
                    path.push_str(&urlencoding::encode(search));
                }
                path.push_str("&sortBy=");
                path.push_str(params.sort_by.as_query_value());
                path.push_str("&order=");
                path.push_str(params.order.as_query_value());
                path
            }
            Self::Recipe(id) => format!("/recipes/{id}"),
        }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecipeList(params) => write!(
                f,
                "recipes[skip={} limit={} q={} sort={}:{}]",
                params.skip,
                params.limit,
                params.search.as_deref().unwrap_or("-"),
                params.sort_by.as_query_value(),
                params.order.as_query_value()
            ),
            Self::Recipe(id) => write!(f, "recipe[{id}]"),
        }
    }
}

/// Invalidation label carried by cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// A specific recipe.
    Recipe(i64),
    /// The recipe collection as a whole; every listing entry carries it.
    RecipeList,
}
