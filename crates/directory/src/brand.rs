use repdesk_db::table::{Brand as BrandTable, Product};
use sea_query::{Expr, ExprTrait, Func, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::{SqliteConnection, prelude::FromRow};
use validator::Validate;

use crate::optional;

#[derive(Debug, Clone, FromRow)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct BrandInput {
    #[validate(length(min = 1, max = 120, message = "must be 1 to 120 characters"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl BrandInput {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            description: optional(self.description),
        }
    }
}

fn select() -> SelectStatement {
    Query::select()
        .columns([
            BrandTable::Id,
            BrandTable::Name,
            BrandTable::Description,
            BrandTable::CreatedAt,
        ])
        .from(BrandTable::Table)
        .to_owned()
}

impl super::Directory {
    pub async fn list_brands(&self) -> repdesk_shared::Result<Vec<Brand>> {
        let statement = select()
            .order_by(BrandTable::Name, Order::Asc)
            .order_by(BrandTable::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Brand, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    pub async fn find_brand(&self, id: impl Into<String>) -> repdesk_shared::Result<Option<Brand>> {
        let statement = select()
            .and_where(Expr::col(BrandTable::Id).eq(id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Brand, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    pub async fn create_brand(&self, input: BrandInput) -> repdesk_shared::Result<String> {
        let input = input.normalized();
        input.validate()?;

        let id = repdesk_shared::new_id();
        let statement = Query::insert()
            .into_table(BrandTable::Table)
            .columns([
                BrandTable::Id,
                BrandTable::Name,
                BrandTable::Description,
                BrandTable::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                input.name.into(),
                input.description.into(),
                crate::now().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        tracing::info!(brand_id = %id, "brand created");

        Ok(id)
    }

    pub async fn update_brand(
        &self,
        id: impl Into<String>,
        input: BrandInput,
    ) -> repdesk_shared::Result<()> {
        let input = input.normalized();
        input.validate()?;

        let statement = Query::update()
            .table(BrandTable::Table)
            .values([
                (BrandTable::Name, input.name.into()),
                (BrandTable::Description, input.description.into()),
            ])
            .and_where(Expr::col(BrandTable::Id).eq(id.into()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        if result.rows_affected() == 0 {
            repdesk_shared::not_found!("brand");
        }

        Ok(())
    }

    /// Products of the brand are kept and detached from it.
    pub async fn delete_brand(&self, id: impl Into<String>) -> repdesk_shared::Result<()> {
        let id = id.into();
        let mut tx = self.write_db.begin().await?;

        let statement = Query::update()
            .table(Product::Table)
            .value(Product::BrandId, Option::<String>::None)
            .and_where(Expr::col(Product::BrandId).eq(id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let detached = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let statement = Query::delete()
            .from_table(BrandTable::Table)
            .and_where(Expr::col(BrandTable::Id).eq(id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            repdesk_shared::not_found!("brand");
        }

        tx.commit().await?;

        tracing::info!(
            brand_id = %id,
            detached_products = detached.rows_affected(),
            "brand deleted"
        );

        Ok(())
    }
}

pub(crate) async fn brand_exists(
    conn: &mut SqliteConnection,
    id: &str,
) -> repdesk_shared::Result<bool> {
    let statement = Query::select()
        .expr(Func::count(Expr::col(BrandTable::Id)))
        .from(BrandTable::Table)
        .and_where(Expr::col(BrandTable::Id).eq(id))
        .to_owned();

    Ok(crate::count(conn, statement).await? > 0)
}
