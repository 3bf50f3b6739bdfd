//! Builds parameterized SELECT and INSERT statements for the demons table.

use crate::query::{Filter, Sort};
use crate::record::NewRecord;
use crate::sql::BindValue;

/// Table holding every catalog record.
pub const TABLE: &str = "demons";

/// Columns in select order; matches the fields of [`crate::record::Record`].
pub const COLUMNS: &[&str] = &["id", "name", "description", "race", "alignment", "imageUrl"];

/// Quote identifier for SQLite (safe: only from allowlists in this crate).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn select_column_list() -> String {
    COLUMNS.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) {
        self.params.push(v);
    }
}

/// `CREATE TABLE IF NOT EXISTS` for the demons table.
pub fn create_table() -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            "id" INTEGER PRIMARY KEY AUTOINCREMENT,
            "name" TEXT NOT NULL UNIQUE,
            "description" TEXT NOT NULL DEFAULT '',
            "race" TEXT NOT NULL DEFAULT '',
            "alignment" TEXT NOT NULL,
            "imageUrl" TEXT NOT NULL DEFAULT ''
        )
        "#,
        quoted(TABLE)
    )
}

/// SELECT list with at most one equality filter, one sort key, LIMIT and OFFSET.
/// Filter value, limit and offset are bound; column and direction come from allowlists.
pub fn select_list(filter: Option<&Filter>, sort: &Sort, limit: u32, offset: u64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = match filter {
        Some(f) => {
            q.push_param(f.value.clone());
            format!(" WHERE {} = ?", quoted(f.column))
        }
        None => String::new(),
    };
    q.push_param(BindValue::I64(i64::from(limit)));
    q.push_param(BindValue::I64(i64::try_from(offset).unwrap_or(i64::MAX)));
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {} {} LIMIT ? OFFSET ?",
        select_column_list(),
        quoted(TABLE),
        where_clause,
        quoted(sort.column),
        sort.direction.as_sql()
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(BindValue::I64(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ?",
        select_column_list(),
        quoted(TABLE),
        quoted("id")
    );
    q
}

fn insert_values(record: &NewRecord, q: &mut QueryBuf) -> (String, String) {
    let values = [
        ("name", &record.name),
        ("description", &record.description),
        ("race", &record.race),
        ("alignment", &record.alignment),
        ("imageUrl", &record.image_url),
    ];
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (col, val) in values {
        q.push_param(BindValue::Text(val.clone()));
        cols.push(quoted(col));
        placeholders.push("?");
    }
    (cols.join(", "), placeholders.join(", "))
}

/// INSERT returning the stored row. A duplicate name fails with a unique violation.
pub fn insert(record: &NewRecord) -> QueryBuf {
    let mut q = QueryBuf::new();
    let (cols, placeholders) = insert_values(record, &mut q);
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(TABLE),
        cols,
        placeholders,
        select_column_list()
    );
    q
}

/// INSERT that silently does nothing when the name already exists.
pub fn insert_if_absent(record: &NewRecord) -> QueryBuf {
    let mut q = QueryBuf::new();
    let (cols, placeholders) = insert_values(record, &mut q);
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) DO NOTHING",
        quoted(TABLE),
        cols,
        placeholders,
        quoted("name")
    );
    q
}
