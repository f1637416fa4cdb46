//! In-process table with the same find and soft-delete semantics as
//! [`crate::SoftDeleteRepository`]. Backs the in-memory repositories used by
//! service tests and database-less runs.
//!
//! Filters and sort keys address the record's serialized JSON fields and
//! must be listed in [`Record::FIELDS`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{DatabaseError, DatabaseResult, FindArgs, Page};

pub trait Record: Clone + Serialize + Send + Sync + 'static {
    /// Serialized fields that may be filtered or sorted on
    const FIELDS: &'static [&'static str];

    fn id(&self) -> Uuid;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;
    fn set_deleted_at(&mut self, at: DateTime<Utc>);
}

#[derive(Clone)]
pub struct MemoryTable<T> {
    rows: Arc<RwLock<Vec<T>>>,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<T: Record> MemoryTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find(&self, args: &FindArgs) -> DatabaseResult<Page<T>> {
        for field in args.filter.keys() {
            known_field::<T>(field)?;
        }
        if !args.sort_by.is_empty() {
            known_field::<T>(&args.sort_by)?;
        }

        let rows = self.rows.read().await;

        let mut matched = Vec::new();
        for row in rows.iter().filter(|row| row.deleted_at().is_none()) {
            let json = serde_json::to_value(row)?;
            if matches_filter(&json, &args.filter)? {
                matched.push((json, row.clone()));
            }
        }

        if !args.sort_by.is_empty() {
            matched.sort_by(|(a, _), (b, _)| {
                let ordering = compare_json(&a[&args.sort_by], &b[&args.sort_by]);
                if args.sort_ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        let total = matched.len() as u64;
        let window = matched
            .into_iter()
            .map(|(_, row)| row)
            .skip(args.offset.max(0) as usize);
        let records = if args.limit > 0 {
            window.take(args.limit as usize).collect()
        } else {
            window.collect()
        };

        Ok(Page::new(args.limit, args.offset, total, records))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<T> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id() == id && row.deleted_at().is_none())
            .cloned()
    }

    /// Active rows satisfying `predicate`, in insertion order
    pub async fn select<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.rows
            .read()
            .await
            .iter()
            .filter(|row| row.deleted_at().is_none() && predicate(row))
            .cloned()
            .collect()
    }

    pub async fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        self.rows
            .read()
            .await
            .iter()
            .any(|row| row.deleted_at().is_none() && predicate(row))
    }

    pub async fn insert(&self, record: T) -> DatabaseResult<()> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.id() == record.id()) {
            return Err(DatabaseError::UniqueViolation(format!(
                "duplicate id {}",
                record.id()
            )));
        }
        rows.push(record);
        Ok(())
    }

    /// Replaces the active row with the same id; returns the rows touched.
    pub async fn update(&self, record: T) -> u64 {
        replace(&mut self.rows.write().await, record)
    }

    /// Replaces several rows under one lock, so readers never see a partial batch.
    pub async fn update_all(&self, records: Vec<T>) -> u64 {
        let mut rows = self.rows.write().await;
        records
            .into_iter()
            .map(|record| replace(&mut rows, record))
            .sum()
    }

    pub async fn soft_delete(&self, id: Uuid) -> u64 {
        let mut rows = self.rows.write().await;
        match rows
            .iter_mut()
            .find(|row| row.id() == id && row.deleted_at().is_none())
        {
            Some(row) => {
                row.set_deleted_at(Utc::now());
                1
            }
            None => 0,
        }
    }

    pub async fn len(&self) -> usize {
        self.select(|_| true).await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn replace<T: Record>(rows: &mut [T], record: T) -> u64 {
    match rows
        .iter_mut()
        .find(|row| row.id() == record.id() && row.deleted_at().is_none())
    {
        Some(row) => {
            *row = record;
            1
        }
        None => 0,
    }
}

fn known_field<T: Record>(field: &str) -> DatabaseResult<()> {
    if T::FIELDS.contains(&field) {
        Ok(())
    } else {
        Err(DatabaseError::invalid_query(format!("unknown field '{}'", field)))
    }
}

fn matches_filter(json: &Value, filter: &BTreeMap<String, String>) -> DatabaseResult<bool> {
    for (field, expected) in filter {
        match json.get(field) {
            Some(Value::Object(_) | Value::Array(_)) => {
                return Err(DatabaseError::invalid_query(format!(
                    "field '{}' cannot be filtered",
                    field
                )));
            }
            Some(value) if as_text(value) == *expected => {}
            _ => return Ok(false),
        }
    }
    Ok(true)
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_json(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => as_text(a).cmp(&as_text(b)),
    }
}
