use repdesk_shared::user::{Role, State};
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::repository::{self, FindType, UserRow};

#[derive(Debug, Clone)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub state: State,
    pub created_at: i64,
}

impl UserView {
    pub fn is_suspended(&self) -> bool {
        self.state == State::Suspended
    }

    pub fn created_on(&self) -> String {
        OffsetDateTime::from_unix_timestamp(self.created_at)
            .map(|at| at.date().to_string())
            .unwrap_or_default()
    }
}

impl From<UserRow> for UserView {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            role: row.role.0,
            state: row.state.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    pub async fn list(&self) -> repdesk_shared::Result<Vec<UserView>> {
        let rows = repository::list(&self.0).await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn find(&self, id: impl Into<String>) -> repdesk_shared::Result<Option<UserView>> {
        let row = repository::find(&self.0, FindType::Id(id.into())).await?;

        Ok(row.map(Into::into))
    }

    pub async fn find_by_email(
        &self,
        email: impl Into<String>,
    ) -> repdesk_shared::Result<Option<UserView>> {
        let row = repository::find(&self.0, FindType::Email(email.into())).await?;

        Ok(row.map(Into::into))
    }

    /// Account behind a session token. Suspended accounts no longer resolve.
    pub async fn find_session(
        &self,
        id: impl Into<String>,
    ) -> repdesk_shared::Result<Option<crate::Account>> {
        let row = repository::find(&self.0, FindType::Id(id.into())).await?;

        Ok(row
            .filter(|row| row.state.0 == State::Active)
            .map(Into::into))
    }
}
