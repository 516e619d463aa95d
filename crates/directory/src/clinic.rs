use repdesk_db::table::{Clinic as ClinicTable, Doctor};
use sea_query::{Expr, ExprTrait, Func, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::{SqliteConnection, prelude::FromRow};
use validator::Validate;

use crate::optional;

#[derive(Debug, Clone, FromRow)]
pub struct Clinic {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct ClinicInput {
    #[validate(length(min = 1, max = 120, message = "must be 1 to 120 characters"))]
    pub name: String,
    #[validate(length(max = 250))]
    pub address: Option<String>,
    #[validate(length(max = 80))]
    pub city: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
}

impl ClinicInput {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            address: optional(self.address),
            city: optional(self.city),
            phone: optional(self.phone),
        }
    }
}

fn select() -> SelectStatement {
    Query::select()
        .columns([
            ClinicTable::Id,
            ClinicTable::Name,
            ClinicTable::Address,
            ClinicTable::City,
            ClinicTable::Phone,
            ClinicTable::CreatedAt,
        ])
        .from(ClinicTable::Table)
        .to_owned()
}

impl super::Directory {
    pub async fn list_clinics(&self) -> repdesk_shared::Result<Vec<Clinic>> {
        let statement = select()
            .order_by(ClinicTable::Name, Order::Asc)
            .order_by(ClinicTable::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Clinic, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    pub async fn find_clinic(&self, id: impl Into<String>) -> repdesk_shared::Result<Option<Clinic>> {
        let statement = select()
            .and_where(Expr::col(ClinicTable::Id).eq(id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Clinic, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    pub async fn create_clinic(&self, input: ClinicInput) -> repdesk_shared::Result<String> {
        let input = input.normalized();
        input.validate()?;

        let id = repdesk_shared::new_id();
        let statement = Query::insert()
            .into_table(ClinicTable::Table)
            .columns([
                ClinicTable::Id,
                ClinicTable::Name,
                ClinicTable::Address,
                ClinicTable::City,
                ClinicTable::Phone,
                ClinicTable::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                input.name.into(),
                input.address.into(),
                input.city.into(),
                input.phone.into(),
                crate::now().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        tracing::info!(clinic_id = %id, "clinic created");

        Ok(id)
    }

    pub async fn update_clinic(
        &self,
        id: impl Into<String>,
        input: ClinicInput,
    ) -> repdesk_shared::Result<()> {
        let input = input.normalized();
        input.validate()?;

        let statement = Query::update()
            .table(ClinicTable::Table)
            .values([
                (ClinicTable::Name, input.name.into()),
                (ClinicTable::Address, input.address.into()),
                (ClinicTable::City, input.city.into()),
                (ClinicTable::Phone, input.phone.into()),
            ])
            .and_where(Expr::col(ClinicTable::Id).eq(id.into()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        if result.rows_affected() == 0 {
            repdesk_shared::not_found!("clinic");
        }

        Ok(())
    }

    /// Doctors working at the clinic are kept and detached from it.
    pub async fn delete_clinic(&self, id: impl Into<String>) -> repdesk_shared::Result<()> {
        let id = id.into();
        let mut tx = self.write_db.begin().await?;

        let statement = Query::update()
            .table(Doctor::Table)
            .value(Doctor::ClinicId, Option::<String>::None)
            .and_where(Expr::col(Doctor::ClinicId).eq(id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let detached = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let statement = Query::delete()
            .from_table(ClinicTable::Table)
            .and_where(Expr::col(ClinicTable::Id).eq(id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            repdesk_shared::not_found!("clinic");
        }

        tx.commit().await?;

        tracing::info!(
            clinic_id = %id,
            detached_doctors = detached.rows_affected(),
            "clinic deleted"
        );

        Ok(())
    }
}

pub(crate) async fn clinic_exists(
    conn: &mut SqliteConnection,
    id: &str,
) -> repdesk_shared::Result<bool> {
    let statement = Query::select()
        .expr(Func::count(Expr::col(ClinicTable::Id)))
        .from(ClinicTable::Table)
        .and_where(Expr::col(ClinicTable::Id).eq(id))
        .to_owned();

    Ok(crate::count(conn, statement).await? > 0)
}
