use std::ops::Deref;

use repdesk_db::table::{
    Assignment, AssignmentDoctor, AssignmentProduct, Doctor, Product, Representative,
};
use repdesk_shared::Metadata;
use sea_query::{Expr, ExprTrait, Func, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqliteConnection;

use crate::{AssignmentRequest, Status, weekday_index};

#[derive(Clone)]
pub struct Command(pub repdesk_shared::State);

impl Deref for Command {
    type Target = repdesk_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

async fn count(
    conn: &mut SqliteConnection,
    statement: SelectStatement,
) -> repdesk_shared::Result<usize> {
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let (count,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(conn)
        .await?;

    Ok(count as usize)
}

impl Command {
    /// Stores one assignment per date of the request's plan, all sharing a
    /// new series id. Either every row is written or none is.
    pub async fn submit(
        &self,
        request: &AssignmentRequest,
        metadata: &Metadata,
    ) -> repdesk_shared::Result<String> {
        let mut tx = self.write_db.begin().await?;

        let representatives = Query::select()
            .expr(Func::count(Expr::col(Representative::Id)))
            .from(Representative::Table)
            .and_where(Expr::col(Representative::Id).eq(request.representative_id.to_owned()))
            .to_owned();
        if count(&mut *tx, representatives).await? == 0 {
            repdesk_shared::user!("Selected representative does not exist");
        }

        let doctors = Query::select()
            .expr(Func::count(Expr::col(Doctor::Id)))
            .from(Doctor::Table)
            .and_where(Expr::col(Doctor::Id).is_in(request.doctor_ids.to_owned()))
            .to_owned();
        if count(&mut *tx, doctors).await? != request.doctor_ids.len() {
            repdesk_shared::user!("One of the selected doctors does not exist");
        }

        let products = Query::select()
            .expr(Func::count(Expr::col(Product::Id)))
            .from(Product::Table)
            .and_where(Expr::col(Product::Id).is_in(request.product_ids.to_owned()))
            .to_owned();
        if count(&mut *tx, products).await? != request.product_ids.len() {
            repdesk_shared::user!("One of the selected products does not exist");
        }

        let series_id = repdesk_shared::new_id();
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        let dates = request.dates();

        let mut assignments = Query::insert()
            .into_table(Assignment::Table)
            .columns([
                Assignment::Id,
                Assignment::SeriesId,
                Assignment::RepresentativeId,
                Assignment::Weekday,
                Assignment::ScheduledOn,
                Assignment::Note,
                Assignment::Status,
                Assignment::CreatedBy,
                Assignment::CreatedAt,
            ])
            .to_owned();
        let mut doctors = Query::insert()
            .into_table(AssignmentDoctor::Table)
            .columns([AssignmentDoctor::AssignmentId, AssignmentDoctor::DoctorId])
            .to_owned();
        let mut products = Query::insert()
            .into_table(AssignmentProduct::Table)
            .columns([AssignmentProduct::AssignmentId, AssignmentProduct::ProductId])
            .to_owned();

        for date in dates.iter() {
            let id = repdesk_shared::new_id();

            assignments.values_panic([
                id.to_owned().into(),
                series_id.to_owned().into(),
                request.representative_id.to_owned().into(),
                weekday_index(request.weekday).into(),
                date.to_julian_day().into(),
                request.note.to_owned().into(),
                Status::Scheduled.to_string().into(),
                metadata.requested_by.to_owned().into(),
                now.into(),
            ]);

            for doctor_id in request.doctor_ids.iter() {
                doctors.values_panic([id.to_owned().into(), doctor_id.to_owned().into()]);
            }

            for product_id in request.product_ids.iter() {
                products.values_panic([id.to_owned().into(), product_id.to_owned().into()]);
            }
        }

        for statement in [assignments, doctors, products] {
            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        tracing::info!(
            series_id = %series_id,
            representative_id = %request.representative_id,
            count = dates.len(),
            first = ?dates.first(),
            requested_by = ?metadata.requested_by,
            "assignment series created"
        );

        Ok(series_id)
    }

    pub async fn set_status(
        &self,
        id: impl Into<String>,
        status: Status,
        metadata: &Metadata,
    ) -> repdesk_shared::Result<()> {
        let id = id.into();
        let statement = Query::update()
            .table(Assignment::Table)
            .value(Assignment::Status, status.as_ref())
            .and_where(Expr::col(Assignment::Id).eq(id.to_owned()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        if result.rows_affected() == 0 {
            repdesk_shared::not_found!("assignment");
        }

        tracing::info!(
            assignment_id = %id,
            status = %status,
            requested_by = ?metadata.requested_by,
            "assignment status changed"
        );

        Ok(())
    }

    /// Removes every assignment of a series together with its links.
    pub async fn delete_series(
        &self,
        series_id: impl Into<String>,
        metadata: &Metadata,
    ) -> repdesk_shared::Result<u64> {
        let series_id = series_id.into();
        let mut tx = self.write_db.begin().await?;

        let in_series = Query::select()
            .column(Assignment::Id)
            .from(Assignment::Table)
            .and_where(Expr::col(Assignment::SeriesId).eq(series_id.to_owned()))
            .to_owned();

        let statements = [
            Query::delete()
                .from_table(AssignmentDoctor::Table)
                .and_where(Expr::col(AssignmentDoctor::AssignmentId).in_subquery(in_series.clone()))
                .to_owned(),
            Query::delete()
                .from_table(AssignmentProduct::Table)
                .and_where(Expr::col(AssignmentProduct::AssignmentId).in_subquery(in_series))
                .to_owned(),
        ];

        for statement in statements {
            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        }

        let statement = Query::delete()
            .from_table(Assignment::Table)
            .and_where(Expr::col(Assignment::SeriesId).eq(series_id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let deleted = sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            repdesk_shared::not_found!("assignment series");
        }

        tx.commit().await?;

        tracing::info!(
            series_id = %series_id,
            deleted,
            requested_by = ?metadata.requested_by,
            "assignment series deleted"
        );

        Ok(deleted)
    }
}
