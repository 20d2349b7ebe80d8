//! Database access layer

pub mod activities;
pub mod admins;
pub mod applicants;
pub mod clients;
pub mod departments;
pub mod jobs;
pub mod national_figures;
pub mod stats;

use shared::query::ListQuery;
use sqlx::{Postgres, QueryBuilder};

/// `ILIKE` pattern matching `term` anywhere, with wildcards in `term` escaped
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Append `AND (col1 ILIKE $n OR col2 ILIKE $n ...)` when a search term is set
pub fn push_search(qb: &mut QueryBuilder<'_, Postgres>, columns: &[&str], query: &ListQuery) {
    let Some(term) = query.search() else {
        return;
    };
    let pattern = like_pattern(term);
    qb.push(" AND (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
    }
    qb.push(")");
}

/// Append `ORDER BY <order> LIMIT $n OFFSET $m`
pub fn push_page(qb: &mut QueryBuilder<'_, Postgres>, order: &str, query: &ListQuery) {
    qb.push(" ORDER BY ")
        .push(order)
        .push(" LIMIT ")
        .push_bind(i64::from(query.limit()))
        .push(" OFFSET ")
        .push_bind(query.offset());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("kigali"), "%kigali%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_push_search_and_page() {
        let query = ListQuery {
            page: Some(2),
            limit: Some(10),
            search: Some(" ana ".into()),
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM clients WHERE TRUE");
        push_search(&mut qb, &["first_name", "email"], &query);
        push_page(&mut qb, "created_at DESC", &query);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM clients WHERE TRUE AND (first_name ILIKE $1 OR email ILIKE $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        );
    }

    #[test]
    fn test_push_search_skips_blank_term() {
        let query = ListQuery {
            search: Some("   ".into()),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 WHERE TRUE");
        push_search(&mut qb, &["name"], &query);
        assert_eq!(qb.sql(), "SELECT 1 WHERE TRUE");
    }
}
