//! Shared SQL fragments for the SQLite store.

use crate::db::{OrderKey, RangeQuery, SortOrder};

/// Projection turning a `todos` row into a JSON object.
///
/// The row reaches the validator in its raw shape; `done` is emitted as a
/// JSON boolean only when the column holds 0 or 1, anything else becomes null.
pub const TODO_JSON: &str = "json_object(\
     'id', id, \
     'date', date, \
     'content', content, \
     'done', json(CASE done WHEN 1 THEN 'true' WHEN 0 THEN 'false' ELSE 'null' END)\
     ) AS row";

/// Build ORDER BY clause from a range query.
///
/// Dates sort as instants (`julianday`, millisecond resolution) rather than
/// as text, so offsets and mixed fractional precision order the same way the
/// JSON store orders them. Ties fall back to insertion order in the same
/// direction.
pub fn build_order_clause(query: &RangeQuery) -> String {
    let order = match query.sort_order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };

    format!(
        "ORDER BY {key} {order}, rowid {order}",
        key = sort_key(query.order_by),
        order = order
    )
}

fn sort_key(key: OrderKey) -> &'static str {
    match key {
        OrderKey::Date => "julianday(date)",
    }
}

/// Build LIMIT/OFFSET clause from a range query.
pub fn build_limit_offset_clause(query: &RangeQuery) -> String {
    format!(" LIMIT {} OFFSET {}", to_sql_int(query.len()), to_sql_int(query.start))
}

fn to_sql_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
