//! Course listing filters.
//!
//! Query parameters are parsed into a [`CourseFilter`] and then composed into a
//! [`CoursePredicate`]. The predicate can be evaluated against a course in
//! memory or rendered into a SQL `WHERE` clause; both give the same answer.

use sqlx::{QueryBuilder, Sqlite};
use url::form_urlencoded;

use crate::models::{Course, CourseListQuery};

/// How the `id` query parameter was interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdFilter {
    Any,
    Exact(i64),
    /// Present but not an integer; matches nothing
    Malformed(String),
}

/// Parsed listing filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFilter {
    pub id: IdFilter,
    pub name: Option<String>,
    /// Filter keys given more than once; any entry matches nothing
    pub repeated: Vec<String>,
}

impl Default for CourseFilter {
    fn default() -> Self {
        Self {
            id: IdFilter::Any,
            name: None,
            repeated: Vec::new(),
        }
    }
}

impl CourseFilter {
    pub fn from_query(query: &CourseListQuery) -> Self {
        let id = match query.id.as_deref().map(str::trim) {
            None | Some("") => IdFilter::Any,
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => IdFilter::Exact(id),
                Err(_) => IdFilter::Malformed(raw.to_string()),
            },
        };

        let name = query.name.clone().filter(|name| !name.is_empty());

        Self {
            id,
            name,
            repeated: Vec::new(),
        }
    }

    /// Parse a raw query string without ever rejecting it.
    ///
    /// Unknown keys are ignored. A filter key that appears more than once is
    /// recorded in `repeated` and narrows the listing to nothing.
    pub fn from_raw_query(raw: Option<&str>) -> Self {
        let mut query = CourseListQuery::default();
        let mut repeated = Vec::new();

        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "id" => &mut query.id,
                "name" => &mut query.name,
                _ => continue,
            };
            if slot.is_some() {
                if !repeated.iter().any(|k: &String| k == key.as_ref()) {
                    repeated.push(key.into_owned());
                }
                continue;
            }
            *slot = Some(value.into_owned());
        }

        Self {
            repeated,
            ..Self::from_query(&query)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoursePredicate {
    All,
    Nothing,
    IdEq(i64),
    NameEq(String),
    And(Box<CoursePredicate>, Box<CoursePredicate>),
}

impl CoursePredicate {
    /// Compose a predicate from parsed filters; multiple filters combine with AND.
    pub fn from_filter(filter: &CourseFilter) -> Self {
        if !filter.repeated.is_empty() {
            return CoursePredicate::Nothing;
        }

        let by_id = match &filter.id {
            IdFilter::Any => CoursePredicate::All,
            IdFilter::Exact(id) => CoursePredicate::IdEq(*id),
            IdFilter::Malformed(_) => CoursePredicate::Nothing,
        };
        let by_name = match &filter.name {
            Some(name) => CoursePredicate::NameEq(name.clone()),
            None => CoursePredicate::All,
        };
        by_id.and(by_name)
    }

    /// Conjunction, folding away `All` and short-circuiting on `Nothing`
    pub fn and(self, other: CoursePredicate) -> CoursePredicate {
        match (self, other) {
            (CoursePredicate::Nothing, _) | (_, CoursePredicate::Nothing) => {
                CoursePredicate::Nothing
            }
            (CoursePredicate::All, p) | (p, CoursePredicate::All) => p,
            (a, b) => CoursePredicate::And(Box::new(a), Box::new(b)),
        }
    }

    pub fn matches(&self, course: &Course) -> bool {
        match self {
            CoursePredicate::All => true,
            CoursePredicate::Nothing => false,
            CoursePredicate::IdEq(id) => course.id == *id,
            CoursePredicate::NameEq(name) => course.name == *name,
            CoursePredicate::And(a, b) => a.matches(course) && b.matches(course),
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, CoursePredicate::Nothing)
    }

    /// Append ` WHERE ...` for this predicate; `All` appends nothing.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        if *self == CoursePredicate::All {
            return;
        }
        qb.push(" WHERE ");
        self.push_condition(qb);
    }

    fn push_condition(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            CoursePredicate::All => {
                qb.push("1 = 1");
            }
            CoursePredicate::Nothing => {
                qb.push("1 = 0");
            }
            CoursePredicate::IdEq(id) => {
                qb.push("id = ").push_bind(*id);
            }
            CoursePredicate::NameEq(name) => {
                qb.push("name = ").push_bind(name.clone());
            }
            CoursePredicate::And(a, b) => {
                qb.push("(");
                a.push_condition(qb);
                qb.push(" AND ");
                b.push_condition(qb);
                qb.push(")");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn query(id: Option<&str>, name: Option<&str>) -> CourseListQuery {
        CourseListQuery {
            id: id.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    fn course(id: i64, name: &str) -> Course {
        Course {
            id,
            name: name.to_string(),
            students: Vec::new(),
        }
    }

    fn predicate(id: Option<&str>, name: Option<&str>) -> CoursePredicate {
        CoursePredicate::from_filter(&CourseFilter::from_query(&query(id, name)))
    }

    #[test]
    fn test_no_filters_match_everything() {
        assert_eq!(predicate(None, None), CoursePredicate::All);
        assert!(predicate(None, None).matches(&course(1, "a")));
    }

    #[test]
    fn test_empty_values_are_ignored() {
        assert_eq!(predicate(Some(""), Some("")), CoursePredicate::All);
    }

    #[test]
    fn test_id_filter() {
        let p = predicate(Some("4"), None);
        assert_eq!(p, CoursePredicate::IdEq(4));
        assert!(p.matches(&course(4, "x")));
        assert!(!p.matches(&course(5, "x")));
    }

    #[test]
    fn test_malformed_id_matches_nothing() {
        let filter = CourseFilter::from_query(&query(Some("abc"), None));
        assert_eq!(filter.id, IdFilter::Malformed("abc".to_string()));

        let p = CoursePredicate::from_filter(&filter);
        assert!(p.is_nothing());
        assert!(!p.matches(&course(1, "abc")));
    }

    #[test]
    fn test_name_filter_is_exact_and_case_sensitive() {
        let p = predicate(None, Some("Rust"));
        assert!(p.matches(&course(1, "Rust")));
        assert!(!p.matches(&course(1, "rust")));
        assert!(!p.matches(&course(1, "Rust 101")));
    }

    #[test]
    fn test_both_filters_combine_with_and() {
        let p = predicate(Some("2"), Some("Go"));
        assert_eq!(
            p,
            CoursePredicate::And(
                Box::new(CoursePredicate::IdEq(2)),
                Box::new(CoursePredicate::NameEq("Go".to_string()))
            )
        );
        assert!(p.matches(&course(2, "Go")));
        assert!(!p.matches(&course(2, "Rust")));
        assert!(!p.matches(&course(3, "Go")));
    }

    #[test]
    fn test_raw_query_parsing() {
        let filter = CourseFilter::from_raw_query(Some("id=3&name=Rust%20101&page=2"));
        assert_eq!(filter.id, IdFilter::Exact(3));
        assert_eq!(filter.name.as_deref(), Some("Rust 101"));
        assert!(filter.repeated.is_empty());

        assert_eq!(CourseFilter::from_raw_query(None), CourseFilter::default());
        assert_eq!(
            CoursePredicate::from_filter(&CourseFilter::from_raw_query(Some("name=a+b"))),
            CoursePredicate::NameEq("a b".to_string())
        );
    }

    #[test]
    fn test_repeated_keys_match_nothing() {
        let filter = CourseFilter::from_raw_query(Some("id=1&id=2&name=x&name=x"));
        assert_eq!(filter.repeated, vec!["id".to_string(), "name".to_string()]);
        assert!(CoursePredicate::from_filter(&filter).is_nothing());

        let filter = CourseFilter::from_raw_query(Some("name=a&id=1&name=b"));
        assert_eq!(filter.id, IdFilter::Exact(1));
        assert!(CoursePredicate::from_filter(&filter).is_nothing());
    }

    #[test]
    fn test_sql_rendering() {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id, name FROM courses");
        predicate(Some("2"), Some("Go")).push_where(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT id, name FROM courses WHERE (id = ? AND name = ?)"
        );

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id, name FROM courses");
        predicate(None, None).push_where(&mut qb);
        assert_eq!(qb.sql(), "SELECT id, name FROM courses");
    }

    proptest! {
        #[test]
        fn prop_and_is_conjunction(
            id in proptest::option::of(1i64..6),
            name in proptest::option::of("[ab]{1,2}"),
            course_id in 1i64..6,
            course_name in "[ab]{1,2}",
        ) {
            let id_str = id.map(|i| i.to_string());
            let p = predicate(id_str.as_deref(), name.as_deref());
            let c = course(course_id, &course_name);

            let expected = id.map_or(true, |i| i == course_id)
                && name.as_ref().map_or(true, |n| *n == course_name);
            prop_assert_eq!(p.matches(&c), expected);
        }
    }
}
