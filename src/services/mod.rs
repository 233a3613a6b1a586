//! Domain services. Each service owns a handle to the connection pool and
//! exposes access-scoped operations; handlers never query the store directly.

pub mod accounts;
pub mod branches;
pub mod dashboard;
pub mod dealers;
pub mod roles;
pub mod supplies;

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};

/// Case-insensitive substring match: `lower(col) LIKE %lower(term)%`.
/// `%`, `_` and the escape character in the term are escaped so they match
/// literally instead of acting as wildcards.
pub(crate) fn ci_like<C: IntoColumnRef>(col: C, term: &str) -> SimpleExpr {
    let escaped = term
        .trim()
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let pattern = LikeExpr::new(format!("%{}%", escaped)).escape('\\');
    Expr::expr(Func::lower(Expr::col(col))).like(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::dealer;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn search_sql(term: &str) -> String {
        dealer::Entity::find()
            .filter(ci_like(dealer::Column::Name, term))
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn like_wildcards_in_the_term_match_literally() {
        let sql = search_sql("100%");
        assert!(sql.contains("%100\\%%"), "got: {sql}");
        assert!(sql.contains("ESCAPE"), "got: {sql}");

        let sql = search_sql("a_b");
        assert!(sql.contains("%a\\_b%"), "got: {sql}");
    }

    #[test]
    fn term_is_trimmed_and_lowercased() {
        let sql = search_sql("  ACME ");
        assert!(sql.contains("%acme%"), "got: {sql}");
    }
}
