use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::Brand;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Brand::Table)
        .col(
            ColumnDef::new(Brand::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Brand::Name)
                .string()
                .not_null()
                .string_len(120),
        )
        .col(ColumnDef::new(Brand::Description).string().string_len(1000))
        .col(ColumnDef::new(Brand::CreatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Brand::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
