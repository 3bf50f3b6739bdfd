//! List query translation: `filter`, `sort`, `page` and `pageSize` parameters to a bounded SELECT.
//!
//! Every parameter is lenient. Anything malformed or outside an allowlist degrades to
//! the default interpretation instead of rejecting the request.

use crate::sql::{select_list, BindValue, QueryBuf};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Columns a `filter=field:value` clause may name.
pub const FILTER_COLUMNS: &[&str] = &["id", "name", "race", "alignment"];

/// Columns a `sort=field_direction` key may name.
pub const SORT_COLUMNS: &[&str] = &["id", "name", "race", "alignment", "imageUrl"];

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Single equality clause. `column` is always one of [`FILTER_COLUMNS`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    pub column: &'static str,
    pub value: BindValue,
}

/// Single sort key. `column` is always one of [`SORT_COLUMNS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub direction: Direction,
}

impl Default for Sort {
    fn default() -> Self {
        Sort {
            column: "id",
            direction: Direction::Asc,
        }
    }
}

fn allowlisted(allowlist: &[&'static str], field: &str) -> Option<&'static str> {
    allowlist.iter().copied().find(|c| *c == field)
}

/// `field:value`, split on the first colon. No colon or an unknown field yields `None`.
pub fn parse_filter(raw: &str) -> Option<Filter> {
    let (field, value) = raw.split_once(':')?;
    let column = allowlisted(FILTER_COLUMNS, field)?;
    Some(Filter {
        column,
        value: BindValue::for_column(column, value),
    })
}

fn sort_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9]+)_((?i:asc|desc))$").expect("static sort pattern"))
}

/// `field_direction` with a case-insensitive direction. Falls back to `id` ascending.
pub fn parse_sort(raw: &str) -> Sort {
    let Some(caps) = sort_pattern().captures(raw) else {
        return Sort::default();
    };
    let Some(column) = allowlisted(SORT_COLUMNS, &caps[1]) else {
        return Sort::default();
    };
    let direction = if caps[2].eq_ignore_ascii_case("desc") {
        Direction::Desc
    } else {
        Direction::Asc
    };
    Sort { column, direction }
}

fn positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).filter(|n| *n >= 1)
}

/// 1-based page number; missing, non-numeric or zero means page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    positive(raw).unwrap_or(DEFAULT_PAGE)
}

/// Rows per page; missing, non-numeric or zero means the default. Capped at `max`.
pub fn parse_page_size(raw: Option<&str>, max: u32) -> u32 {
    positive(raw).unwrap_or(DEFAULT_PAGE_SIZE).min(max.max(1))
}

/// Fully resolved list request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: Option<Filter>,
    pub sort: Sort,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            filter: None,
            sort: Sort::default(),
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    /// Read `filter`, `sort`, `page` and `pageSize` from raw query parameters. Other keys are ignored.
    pub fn from_params(params: &HashMap<String, String>, max_page_size: u32) -> Self {
        ListQuery {
            filter: params.get("filter").and_then(|s| parse_filter(s)),
            sort: params.get("sort").map(|s| parse_sort(s)).unwrap_or_default(),
            page: parse_page(params.get("page").map(String::as_str)),
            page_size: parse_page_size(params.get("pageSize").map(String::as_str), max_page_size),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn to_sql(&self) -> QueryBuf {
        select_list(self.filter.as_ref(), &self.sort, self.page_size, self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn filter_splits_on_first_colon() {
        let f = parse_filter("race:Fata").unwrap();
        assert_eq!(f.column, "race");
        assert_eq!(f.value, BindValue::Text("Fata".into()));

        let f = parse_filter("name:Mot:Reborn").unwrap();
        assert_eq!(f.value, BindValue::Text("Mot:Reborn".into()));
    }

    #[test]
    fn filter_without_colon_or_unknown_field_is_ignored() {
        assert_eq!(parse_filter("race"), None);
        assert_eq!(parse_filter("bogus:x"), None);
        assert_eq!(parse_filter("imageUrl:x"), None);
        assert_eq!(parse_filter("Race:Fata"), None);
    }

    #[test]
    fn sort_accepts_allowlisted_fields_in_any_case_direction() {
        assert_eq!(
            parse_sort("name_asc"),
            Sort {
                column: "name",
                direction: Direction::Asc
            }
        );
        assert_eq!(
            parse_sort("id_DESC"),
            Sort {
                column: "id",
                direction: Direction::Desc
            }
        );
        assert_eq!(parse_sort("imageUrl_Desc").column, "imageUrl");
    }

    #[test]
    fn sort_falls_back_to_id_ascending() {
        for raw in ["name_sideways", "bogus_asc", "name", "", "na-me_asc", "name_asc_desc", "description_desc"] {
            assert_eq!(parse_sort(raw), Sort::default(), "{}", raw);
        }
    }

    #[test]
    fn paging_coerces_bad_values_to_defaults() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some("two")), 1);
        assert_eq!(parse_page(Some("4")), 4);
        assert_eq!(parse_page_size(Some("abc"), 100), 10);
        assert_eq!(parse_page_size(Some("0"), 100), 10);
        assert_eq!(parse_page_size(Some("25"), 100), 25);
        assert_eq!(parse_page_size(Some("100000"), 100), 100);
    }

    #[test]
    fn second_page_of_five_starts_at_offset_five() {
        let q = ListQuery::from_params(&params(&[("page", "2"), ("pageSize", "5")]), 100);
        assert_eq!(q.offset(), 5);
        let sql = q.to_sql();
        assert_eq!(sql.params, vec![BindValue::I64(5), BindValue::I64(5)]);
    }

    #[test]
    fn absent_params_use_defaults() {
        let q = ListQuery::from_params(&HashMap::new(), 100);
        assert_eq!(q, ListQuery::default());
        let q = ListQuery::from_params(&params(&[("filter", "bogus:x"), ("sort", "name_sideways")]), 100);
        assert_eq!(q, ListQuery::default());
    }
}
