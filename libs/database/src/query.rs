//! Turns [`FindArgs`] into SeaORM selects.

use chrono::DateTime;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ColumnType, DatabaseConnection, EntityTrait, FromQueryResult, IdenStatic, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Value,
};
use std::str::FromStr;
use uuid::Uuid;

use crate::{DatabaseError, DatabaseResult, FindArgs, Page};

/// A filtered select split into its page query and its count query.
///
/// Both halves carry the same predicates; only the record half is ordered
/// and windowed.
#[derive(Debug, Clone)]
pub struct FindQuery<E: EntityTrait> {
    records: Select<E>,
    count: Select<E>,
    limit: i64,
    offset: i64,
}

impl<E> FindQuery<E>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync + 'static,
{
    pub fn build(base: Select<E>, args: &FindArgs) -> DatabaseResult<Self> {
        let mut select = base;
        for (field, raw) in &args.filter {
            let column = resolve_column::<E>(field)?;
            select = select.filter(column.eq(filter_value(&column, raw)?));
        }
        let count = select.clone();

        if !args.sort_by.is_empty() {
            let column = resolve_column::<E>(&args.sort_by)?;
            let order = if args.sort_ascending {
                Order::Asc
            } else {
                Order::Desc
            };
            select = select.order_by(column, order);
        }
        if args.limit > 0 {
            select = select.limit(args.limit as u64);
        }
        if args.offset > 0 {
            select = select.offset(args.offset as u64);
        }

        Ok(Self {
            records: select,
            count,
            limit: args.limit,
            offset: args.offset,
        })
    }

    pub fn records(&self) -> &Select<E> {
        &self.records
    }

    pub fn count_query(&self) -> &Select<E> {
        &self.count
    }

    /// Runs the count and then the page query. A failed count fails the call.
    pub async fn fetch(self, db: &DatabaseConnection) -> DatabaseResult<Page<E::Model>> {
        let total = self.count.count(db).await?;
        let records = self.records.all(db).await?;
        Ok(Page::new(self.limit, self.offset, total, records))
    }
}

fn resolve_column<E: EntityTrait>(field: &str) -> DatabaseResult<E::Column> {
    E::Column::from_str(field)
        .map_err(|_| DatabaseError::invalid_query(format!("unknown field '{}'", field)))
}

/// Converts a raw query-string value into a value of the column's type.
fn filter_value<C: ColumnTrait>(column: &C, raw: &str) -> DatabaseResult<Value> {
    let invalid = |expected: &str| {
        DatabaseError::invalid_query(format!(
            "'{}' is not a valid {} for field '{}'",
            raw,
            expected,
            column.as_str()
        ))
    };
    let raw_trimmed = raw.trim();

    let value = match column.def().get_column_type() {
        ColumnType::Uuid => Uuid::parse_str(raw_trimmed)
            .map(Value::from)
            .map_err(|_| invalid("uuid"))?,
        ColumnType::Boolean => raw_trimmed
            .parse::<bool>()
            .map(Value::from)
            .map_err(|_| invalid("boolean"))?,
        ColumnType::TinyInteger | ColumnType::SmallInteger | ColumnType::Integer => raw_trimmed
            .parse::<i32>()
            .map(Value::from)
            .map_err(|_| invalid("integer"))?,
        ColumnType::BigInteger => raw_trimmed
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid("integer"))?,
        ColumnType::Decimal(_) | ColumnType::Money(_) => Decimal::from_str(raw_trimmed)
            .map(Value::from)
            .map_err(|_| invalid("decimal"))?,
        ColumnType::TimestampWithTimeZone => DateTime::parse_from_rfc3339(raw_trimmed)
            .map(Value::from)
            .map_err(|_| invalid("RFC 3339 timestamp"))?,
        ColumnType::Enum { variants, .. } => {
            if !variants.iter().any(|v| v.to_string() == raw_trimmed) {
                return Err(invalid("variant"));
            }
            Value::from(raw_trimmed.to_string())
        }
        ColumnType::Json | ColumnType::JsonBinary => {
            return Err(DatabaseError::invalid_query(format!(
                "field '{}' cannot be filtered",
                column.as_str()
            )));
        }
        _ => Value::from(raw.to_string()),
    };
    Ok(value)
}
