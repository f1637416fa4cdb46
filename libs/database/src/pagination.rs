//! Find arguments and the paginated result envelope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::{DatabaseError, DatabaseResult};

/// Field used when a request does not name one
pub const DEFAULT_SORT_FIELD: &str = "id";

const LIMIT_PARAM: &str = "limit";
const OFFSET_PARAM: &str = "offset";
const SORT_BY_PARAM: &str = "sort_by";
const SORT_ASC_PARAM: &str = "sort_asc";

/// What to fetch: equality filters, one sort key and a window.
///
/// `limit <= 0` is unbounded and `offset <= 0` starts at the first row.
/// Filters live in a `BTreeMap` so predicates are always applied in key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindArgs {
    pub limit: i64,
    pub offset: i64,
    pub sort_by: String,
    pub sort_ascending: bool,
    pub filter: BTreeMap<String, String>,
}

impl Default for FindArgs {
    fn default() -> Self {
        Self {
            limit: 0,
            offset: 0,
            sort_by: DEFAULT_SORT_FIELD.to_string(),
            sort_ascending: true,
            filter: BTreeMap::new(),
        }
    }
}

impl FindArgs {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit,
            offset,
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort_by = field.into();
        self.sort_ascending = ascending;
        self
    }

    pub fn filter_value(&self, field: &str) -> Option<&str> {
        self.filter.get(field).map(String::as_str)
    }

    /// Builds args from raw query-string pairs.
    ///
    /// `limit`, `offset`, `sort_by` and `sort_asc` are reserved; every other
    /// pair becomes an equality filter.
    pub fn from_query<I>(params: I) -> DatabaseResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut args = Self::default();
        for (key, value) in params {
            match key.as_str() {
                LIMIT_PARAM => args.limit = parse_param(&key, &value)?,
                OFFSET_PARAM => args.offset = parse_param(&key, &value)?,
                SORT_BY_PARAM => args.sort_by = value.trim().to_string(),
                SORT_ASC_PARAM => args.sort_ascending = parse_param(&key, &value)?,
                _ => {
                    args.filter.insert(key, value);
                }
            }
        }
        Ok(args)
    }
}

fn parse_param<T: std::str::FromStr>(key: &str, value: &str) -> DatabaseResult<T> {
    value.trim().parse().map_err(|_| {
        DatabaseError::invalid_query(format!("'{}' is not a valid value for '{}'", value, key))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    /// Rows matching the filter, ignoring limit and offset
    pub total_records: u64,
    /// Rows in this page
    pub records_length: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub meta: PageMeta,
    pub records: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(limit: i64, offset: i64, total_records: u64, records: Vec<T>) -> Self {
        let (current_page, total_pages) = if limit > 0 {
            let limit = limit as u64;
            let offset = offset.max(0) as u64;
            (offset / limit + 1, total_records.div_ceil(limit))
        } else {
            (1, 1)
        };

        Self {
            meta: PageMeta {
                total_records,
                records_length: records.len() as u64,
                current_page,
                total_pages,
            },
            records,
        }
    }

    pub fn empty(limit: i64, offset: i64) -> Self {
        Self::new(limit, offset, 0, Vec::new())
    }

    /// Transforms every record, keeping order and metadata.
    pub fn map<K, F>(self, f: F) -> Page<K>
    where
        F: FnMut(T) -> K,
    {
        Page {
            meta: self.meta,
            records: self.records.into_iter().map(f).collect(),
        }
    }

    /// Like [`Page::map`], stopping at the first failed conversion.
    pub fn try_map<K, E, F>(self, f: F) -> Result<Page<K>, E>
    where
        F: FnMut(T) -> Result<K, E>,
    {
        Ok(Page {
            meta: self.meta,
            records: self.records.into_iter().map(f).collect::<Result<_, _>>()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
