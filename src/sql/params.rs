//! Bound values for the SQLite statements built in this crate.

use sqlx::encode::{Encode, IsNull};
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::{Database, Type};

/// A value bound to a `?` placeholder. Identifiers never travel this way; only values do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindValue {
    I64(i64),
    Text(String),
}

impl BindValue {
    /// Typed value for a filter on `column`. The integer key binds as an integer when it
    /// parses as one; anything else binds as text and simply matches nothing.
    pub fn for_column(column: &str, raw: &str) -> Self {
        if column == "id" {
            if let Ok(n) = raw.trim().parse::<i64>() {
                return BindValue::I64(n);
            }
        }
        BindValue::Text(raw.to_string())
    }
}

impl<'q> Encode<'q, Sqlite> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            BindValue::I64(n) => <i64 as Encode<Sqlite>>::encode_by_ref(n, buf),
            BindValue::Text(s) => <String as Encode<Sqlite>>::encode_by_ref(s, buf),
        }
    }
}

impl Type<Sqlite> for BindValue {
    fn type_info() -> SqliteTypeInfo {
        <str as Type<Sqlite>>::type_info()
    }
}
