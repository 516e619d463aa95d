use repdesk_db::table::{AssignmentProduct, Brand, Product as ProductTable};
use sea_query::{
    Alias, Expr, ExprTrait, Func, JoinType, Order, Query, SelectStatement, SqliteQueryBuilder,
};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::{SqliteConnection, prelude::FromRow};
use validator::Validate;

use crate::optional;

#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub brand_id: Option<String>,
    pub brand_name: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 120, message = "must be 1 to 120 characters"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub brand_id: Option<String>,
}

impl ProductInput {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            description: optional(self.description),
            brand_id: optional(self.brand_id),
        }
    }
}

fn select() -> SelectStatement {
    Query::select()
        .columns([
            (ProductTable::Table, ProductTable::Id),
            (ProductTable::Table, ProductTable::Name),
            (ProductTable::Table, ProductTable::Description),
            (ProductTable::Table, ProductTable::BrandId),
            (ProductTable::Table, ProductTable::CreatedAt),
        ])
        .expr_as(Expr::col((Brand::Table, Brand::Name)), Alias::new("brand_name"))
        .from(ProductTable::Table)
        .join(
            JoinType::LeftJoin,
            Brand::Table,
            Expr::col((ProductTable::Table, ProductTable::BrandId))
                .equals((Brand::Table, Brand::Id)),
        )
        .order_by((ProductTable::Table, ProductTable::Name), Order::Asc)
        .order_by((ProductTable::Table, ProductTable::Id), Order::Asc)
        .to_owned()
}

impl super::Directory {
    pub async fn list_products(&self) -> repdesk_shared::Result<Vec<Product>> {
        self.fetch_products(select()).await
    }

    pub async fn count_products(&self) -> repdesk_shared::Result<i64> {
        let statement = Query::select()
            .expr(Func::count(Expr::col(ProductTable::Id)))
            .from(ProductTable::Table)
            .to_owned();

        crate::count(&self.read_db, statement).await
    }

    pub async fn products_by_brand(
        &self,
        brand_id: impl Into<String>,
    ) -> repdesk_shared::Result<Vec<Product>> {
        let statement = select()
            .and_where(Expr::col((ProductTable::Table, ProductTable::BrandId)).eq(brand_id.into()))
            .to_owned();

        self.fetch_products(statement).await
    }

    pub async fn find_product(
        &self,
        id: impl Into<String>,
    ) -> repdesk_shared::Result<Option<Product>> {
        let statement = select()
            .and_where(Expr::col((ProductTable::Table, ProductTable::Id)).eq(id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Product, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    async fn fetch_products(
        &self,
        statement: SelectStatement,
    ) -> repdesk_shared::Result<Vec<Product>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Product, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    async fn check_product_input(
        conn: &mut SqliteConnection,
        input: &ProductInput,
    ) -> repdesk_shared::Result<()> {
        if let Some(brand_id) = input.brand_id.as_deref() {
            if !crate::brand::brand_exists(conn, brand_id).await? {
                repdesk_shared::user!("Selected brand does not exist");
            }
        }

        Ok(())
    }

    pub async fn create_product(&self, input: ProductInput) -> repdesk_shared::Result<String> {
        let input = input.normalized();
        input.validate()?;

        let mut tx = self.write_db.begin().await?;
        Self::check_product_input(&mut *tx, &input).await?;

        let id = repdesk_shared::new_id();
        let statement = Query::insert()
            .into_table(ProductTable::Table)
            .columns([
                ProductTable::Id,
                ProductTable::Name,
                ProductTable::Description,
                ProductTable::BrandId,
                ProductTable::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                input.name.into(),
                input.description.into(),
                input.brand_id.into(),
                crate::now().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        tx.commit().await?;

        tracing::info!(product_id = %id, "product created");

        Ok(id)
    }

    pub async fn update_product(
        &self,
        id: impl Into<String>,
        input: ProductInput,
    ) -> repdesk_shared::Result<()> {
        let input = input.normalized();
        input.validate()?;

        let mut tx = self.write_db.begin().await?;
        Self::check_product_input(&mut *tx, &input).await?;

        let statement = Query::update()
            .table(ProductTable::Table)
            .values([
                (ProductTable::Name, input.name.into()),
                (ProductTable::Description, input.description.into()),
                (ProductTable::BrandId, input.brand_id.into()),
            ])
            .and_where(Expr::col(ProductTable::Id).eq(id.into()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            repdesk_shared::not_found!("product");
        }

        tx.commit().await?;

        Ok(())
    }

    /// Refused while any assignment still presents the product.
    pub async fn delete_product(&self, id: impl Into<String>) -> repdesk_shared::Result<()> {
        let id = id.into();
        let mut tx = self.write_db.begin().await?;

        let statement = Query::select()
            .expr(Func::count(Expr::col(AssignmentProduct::AssignmentId)))
            .from(AssignmentProduct::Table)
            .and_where(Expr::col(AssignmentProduct::ProductId).eq(id.to_owned()))
            .to_owned();

        if crate::count(&mut *tx, statement).await? > 0 {
            repdesk_shared::user!("Product is still linked to assignments");
        }

        let statement = Query::delete()
            .from_table(ProductTable::Table)
            .and_where(Expr::col(ProductTable::Id).eq(id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            repdesk_shared::not_found!("product");
        }

        tx.commit().await?;

        tracing::info!(product_id = %id, "product deleted");

        Ok(())
    }
}
