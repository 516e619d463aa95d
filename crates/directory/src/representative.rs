use repdesk_db::table::{Assignment, Representative as RepresentativeTable, User};
use repdesk_shared::user::Role;
use sea_query::{
    Alias, Expr, ExprTrait, Func, JoinType, Order, Query, SelectStatement, SqliteQueryBuilder,
};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::{SqliteConnection, prelude::FromRow};
use validator::Validate;

use crate::optional;

#[derive(Debug, Clone, FromRow)]
struct RepresentativeRow {
    id: String,
    full_name: String,
    email: String,
    phone: Option<String>,
    territory: Option<String>,
    user_id: Option<String>,
    manager_id: Option<String>,
    created_at: i64,
    linked_user_name: Option<String>,
    linked_user_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedUser {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Representative {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub territory: Option<String>,
    pub user_id: Option<String>,
    pub manager_id: Option<String>,
    pub created_at: i64,
    /// `None` when no login is linked, or when the linked account is gone.
    pub linked_user: Option<LinkedUser>,
}

impl From<RepresentativeRow> for Representative {
    fn from(row: RepresentativeRow) -> Self {
        let linked_user = match (&row.user_id, row.linked_user_name, row.linked_user_email) {
            (Some(id), Some(full_name), Some(email)) => Some(LinkedUser {
                id: id.to_owned(),
                full_name,
                email,
            }),
            (Some(id), _, _) => {
                tracing::warn!(
                    representative_id = %row.id,
                    user_id = %id,
                    "linked user not found"
                );
                None
            }
            (None, _, _) => None,
        };

        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            territory: row.territory,
            user_id: row.user_id,
            manager_id: row.manager_id,
            created_at: row.created_at,
            linked_user,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct RepresentativeInput {
    #[validate(length(min = 1, max = 120, message = "must be 1 to 120 characters"))]
    pub full_name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 120))]
    pub territory: Option<String>,
    pub user_id: Option<String>,
    pub manager_id: Option<String>,
}

impl RepresentativeInput {
    fn normalized(self) -> Self {
        Self {
            full_name: self.full_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: optional(self.phone),
            territory: optional(self.territory),
            user_id: optional(self.user_id),
            manager_id: optional(self.manager_id),
        }
    }
}

fn select() -> SelectStatement {
    Query::select()
        .columns([
            (RepresentativeTable::Table, RepresentativeTable::Id),
            (RepresentativeTable::Table, RepresentativeTable::FullName),
            (RepresentativeTable::Table, RepresentativeTable::Email),
            (RepresentativeTable::Table, RepresentativeTable::Phone),
            (RepresentativeTable::Table, RepresentativeTable::Territory),
            (RepresentativeTable::Table, RepresentativeTable::UserId),
            (RepresentativeTable::Table, RepresentativeTable::ManagerId),
            (RepresentativeTable::Table, RepresentativeTable::CreatedAt),
        ])
        .expr_as(
            Expr::col((User::Table, User::FullName)),
            Alias::new("linked_user_name"),
        )
        .expr_as(
            Expr::col((User::Table, User::Email)),
            Alias::new("linked_user_email"),
        )
        .from(RepresentativeTable::Table)
        .join(
            JoinType::LeftJoin,
            User::Table,
            Expr::col((RepresentativeTable::Table, RepresentativeTable::UserId))
                .equals((User::Table, User::Id)),
        )
        .order_by(
            (RepresentativeTable::Table, RepresentativeTable::FullName),
            Order::Asc,
        )
        .order_by((RepresentativeTable::Table, RepresentativeTable::Id), Order::Asc)
        .to_owned()
}

impl super::Directory {
    pub async fn list_representatives(&self) -> repdesk_shared::Result<Vec<Representative>> {
        self.fetch_representatives(select()).await
    }

    pub async fn count_representatives(&self) -> repdesk_shared::Result<i64> {
        let statement = Query::select()
            .expr(Func::count(Expr::col(RepresentativeTable::Id)))
            .from(RepresentativeTable::Table)
            .to_owned();

        crate::count(&self.read_db, statement).await
    }

    pub async fn representatives_by_manager(
        &self,
        manager_id: impl Into<String>,
    ) -> repdesk_shared::Result<Vec<Representative>> {
        let statement = select()
            .and_where(
                Expr::col((RepresentativeTable::Table, RepresentativeTable::ManagerId))
                    .eq(manager_id.into()),
            )
            .to_owned();

        self.fetch_representatives(statement).await
    }

    /// Representative profile a login is linked to, if any.
    pub async fn representative_by_user(
        &self,
        user_id: impl Into<String>,
    ) -> repdesk_shared::Result<Option<Representative>> {
        let statement = select()
            .and_where(
                Expr::col((RepresentativeTable::Table, RepresentativeTable::UserId))
                    .eq(user_id.into()),
            )
            .limit(1)
            .to_owned();

        self.fetch_representative(statement).await
    }

    pub async fn find_representative(
        &self,
        id: impl Into<String>,
    ) -> repdesk_shared::Result<Option<Representative>> {
        let statement = select()
            .and_where(Expr::col((RepresentativeTable::Table, RepresentativeTable::Id)).eq(id.into()))
            .limit(1)
            .to_owned();

        self.fetch_representative(statement).await
    }

    async fn fetch_representatives(
        &self,
        statement: SelectStatement,
    ) -> repdesk_shared::Result<Vec<Representative>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, RepresentativeRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn fetch_representative(
        &self,
        statement: SelectStatement,
    ) -> repdesk_shared::Result<Option<Representative>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, RepresentativeRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn user_role(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> repdesk_shared::Result<Option<Role>> {
        let statement = Query::select()
            .column(User::Role)
            .from(User::Table)
            .and_where(Expr::col(User::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, (sqlx::types::Text<Role>,), _>(&sql, values)
            .fetch_optional(conn)
            .await?;

        Ok(row.map(|(role,)| role.0))
    }

    async fn check_representative_input(
        conn: &mut SqliteConnection,
        id: Option<&str>,
        input: &RepresentativeInput,
    ) -> repdesk_shared::Result<()> {
        if let Some(user_id) = input.user_id.as_deref() {
            if Self::user_role(&mut *conn, user_id).await?.is_none() {
                repdesk_shared::user!("Selected login does not exist");
            }

            let statement = Query::select()
                .expr(Func::count(Expr::col(RepresentativeTable::Id)))
                .from(RepresentativeTable::Table)
                .and_where(Expr::col(RepresentativeTable::UserId).eq(user_id))
                .and_where(Expr::col(RepresentativeTable::Id).ne(id.unwrap_or_default()))
                .to_owned();

            if crate::count(&mut *conn, statement).await? > 0 {
                repdesk_shared::user!("Login is already linked to another representative");
            }
        }

        if let Some(manager_id) = input.manager_id.as_deref() {
            match Self::user_role(&mut *conn, manager_id).await? {
                Some(role) if role.sees_all_assignments() => {}
                Some(_) => repdesk_shared::user!("Manager must be a manager account"),
                None => repdesk_shared::user!("Selected manager does not exist"),
            }
        }

        Ok(())
    }

    pub async fn create_representative(
        &self,
        input: RepresentativeInput,
    ) -> repdesk_shared::Result<String> {
        let input = input.normalized();
        input.validate()?;

        let mut tx = self.write_db.begin().await?;
        Self::check_representative_input(&mut *tx, None, &input).await?;

        let id = repdesk_shared::new_id();
        let statement = Query::insert()
            .into_table(RepresentativeTable::Table)
            .columns([
                RepresentativeTable::Id,
                RepresentativeTable::FullName,
                RepresentativeTable::Email,
                RepresentativeTable::Phone,
                RepresentativeTable::Territory,
                RepresentativeTable::UserId,
                RepresentativeTable::ManagerId,
                RepresentativeTable::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                input.full_name.into(),
                input.email.into(),
                input.phone.into(),
                input.territory.into(),
                input.user_id.into(),
                input.manager_id.into(),
                crate::now().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        tx.commit().await?;

        tracing::info!(representative_id = %id, "representative created");

        Ok(id)
    }

    pub async fn update_representative(
        &self,
        id: impl Into<String>,
        input: RepresentativeInput,
    ) -> repdesk_shared::Result<()> {
        let id = id.into();
        let input = input.normalized();
        input.validate()?;

        let mut tx = self.write_db.begin().await?;
        Self::check_representative_input(&mut *tx, Some(&id), &input).await?;

        let statement = Query::update()
            .table(RepresentativeTable::Table)
            .values([
                (RepresentativeTable::FullName, input.full_name.into()),
                (RepresentativeTable::Email, input.email.into()),
                (RepresentativeTable::Phone, input.phone.into()),
                (RepresentativeTable::Territory, input.territory.into()),
                (RepresentativeTable::UserId, input.user_id.into()),
                (RepresentativeTable::ManagerId, input.manager_id.into()),
            ])
            .and_where(Expr::col(RepresentativeTable::Id).eq(id.to_owned()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            repdesk_shared::not_found!("representative");
        }

        tx.commit().await?;

        Ok(())
    }

    /// Refused while the representative still has assignments.
    pub async fn delete_representative(&self, id: impl Into<String>) -> repdesk_shared::Result<()> {
        let id = id.into();
        let mut tx = self.write_db.begin().await?;

        let statement = Query::select()
            .expr(Func::count(Expr::col(Assignment::Id)))
            .from(Assignment::Table)
            .and_where(Expr::col(Assignment::RepresentativeId).eq(id.to_owned()))
            .to_owned();

        if crate::count(&mut *tx, statement).await? > 0 {
            repdesk_shared::user!("Representative still has assignments");
        }

        let statement = Query::delete()
            .from_table(RepresentativeTable::Table)
            .and_where(Expr::col(RepresentativeTable::Id).eq(id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            repdesk_shared::not_found!("representative");
        }

        tx.commit().await?;

        tracing::info!(representative_id = %id, "representative deleted");

        Ok(())
    }
}
