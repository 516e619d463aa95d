use repdesk_db::table::User;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use time::OffsetDateTime;

use repdesk_shared::user::{Role, State};

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: sqlx::types::Text<Role>,
    pub state: sqlx::types::Text<State>,
    pub created_at: i64,
}

pub enum FindType {
    Id(String),
    Email(String),
}

const COLUMNS: [User; 7] = [
    User::Id,
    User::Email,
    User::Password,
    User::FullName,
    User::Role,
    User::State,
    User::CreatedAt,
];

pub(crate) async fn find(
    pool: &SqlitePool,
    arg_type: FindType,
) -> repdesk_shared::Result<Option<UserRow>> {
    let mut statement = Query::select()
        .columns(COLUMNS)
        .from(User::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Id(id) => statement.and_where(Expr::col(User::Id).eq(id)),
        FindType::Email(email) => {
            statement.and_where(Expr::col(User::Email).eq(normalize_email(&email)))
        }
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) async fn list(pool: &SqlitePool) -> repdesk_shared::Result<Vec<UserRow>> {
    let statement = Query::select()
        .columns(COLUMNS)
        .from(User::Table)
        .order_by(User::FullName, Order::Asc)
        .order_by(User::Id, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub(crate) struct CreateInput {
    pub id: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
}

pub(crate) async fn create(pool: &SqlitePool, input: CreateInput) -> repdesk_shared::Result<()> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let statement = Query::insert()
        .into_table(User::Table)
        .columns(COLUMNS)
        .values_panic([
            input.id.into(),
            normalize_email(&input.email).into(),
            input.password.into(),
            input.full_name.into(),
            input.role.to_string().into(),
            State::Active.to_string().into(),
            now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub(crate) struct UpdateInput {
    pub id: String,
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub state: Option<State>,
}

pub(crate) async fn update(pool: &SqlitePool, input: UpdateInput) -> repdesk_shared::Result<()> {
    let mut statement = Query::update()
        .table(User::Table)
        .and_where(Expr::col(User::Id).eq(input.id))
        .to_owned();

    if let Some(full_name) = input.full_name {
        statement.value(User::FullName, full_name);
    }

    if let Some(password) = input.password {
        statement.value(User::Password, password);
    }

    if let Some(role) = input.role {
        statement.value(User::Role, role.as_ref());
    }

    if let Some(state) = input.state {
        statement.value(User::State, state.as_ref());
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
