use std::ops::Deref;

use sea_query::{SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqliteExecutor;

mod brand;
mod clinic;
mod doctor;
mod product;
mod representative;

pub use brand::*;
pub use clinic::*;
pub use doctor::*;
pub use product::*;
pub use representative::*;

/// Reference data managed by super admins and managers.
#[derive(Clone)]
pub struct Directory(pub repdesk_shared::State);

impl Deref for Directory {
    type Target = repdesk_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

pub(crate) fn now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

/// Runs a `SELECT COUNT(..)` statement on a pool or inside a write transaction.
pub(crate) async fn count<'c>(
    executor: impl SqliteExecutor<'c>,
    statement: SelectStatement,
) -> repdesk_shared::Result<i64> {
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let (count,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(executor)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_optional_drops_blank_values() {
        assert_eq!(super::optional(Some("  ".to_owned())), None);
        assert_eq!(super::optional(None), None);
        assert_eq!(
            super::optional(Some(" Lyon ".to_owned())),
            Some("Lyon".to_owned())
        );
    }
}
