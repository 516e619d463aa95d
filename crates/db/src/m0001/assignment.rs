use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Assignment;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Assignment::Table)
        .col(
            ColumnDef::new(Assignment::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Assignment::SeriesId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(Assignment::RepresentativeId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(Assignment::Weekday)
                .tiny_integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(Assignment::ScheduledOn)
                .integer()
                .not_null(),
        )
        .col(ColumnDef::new(Assignment::Note).string().string_len(2000))
        .col(
            ColumnDef::new(Assignment::Status)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(ColumnDef::new(Assignment::CreatedBy).string().string_len(26))
        .col(
            ColumnDef::new(Assignment::CreatedAt)
                .big_integer()
                .not_null(),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Assignment::Table).to_owned()
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

pub struct CreateIdx1;

fn create_idx_1() -> IndexCreateStatement {
    Index::create()
        .name("idx_assignment_rep_scheduled_on")
        .table(Assignment::Table)
        .col(Assignment::RepresentativeId)
        .col(Assignment::ScheduledOn)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop().name("idx_assignment_rep_scheduled_on").table(Assignment::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateIdx2;

fn create_idx_2() -> IndexCreateStatement {
    Index::create()
        .name("idx_assignment_series_id")
        .table(Assignment::Table)
        .col(Assignment::SeriesId)
        .to_owned()
}

fn drop_idx_2() -> IndexDropStatement {
    Index::drop().name("idx_assignment_series_id").table(Assignment::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx2 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_2().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_2().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
