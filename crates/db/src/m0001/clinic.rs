use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::Clinic;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Clinic::Table)
        .col(
            ColumnDef::new(Clinic::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Clinic::Name)
                .string()
                .not_null()
                .string_len(120),
        )
        .col(ColumnDef::new(Clinic::Address).string().string_len(250))
        .col(ColumnDef::new(Clinic::City).string().string_len(80))
        .col(ColumnDef::new(Clinic::Phone).string().string_len(30))
        .col(ColumnDef::new(Clinic::CreatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Clinic::Table).to_owned()
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
