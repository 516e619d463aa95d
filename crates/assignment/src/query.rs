use std::collections::HashMap;

use repdesk_db::table::{
    Assignment, AssignmentDoctor, AssignmentProduct, Doctor, Product, Representative,
};
use sea_query::{Alias, Expr, ExprTrait, JoinType, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use time::{Date, Weekday};

use crate::{Status, weekday_from_index};

#[derive(Debug, FromRow)]
struct AssignmentRow {
    id: String,
    series_id: String,
    representative_id: String,
    representative_name: Option<String>,
    weekday: i64,
    scheduled_on: i32,
    note: Option<String>,
    status: sqlx::types::Text<Status>,
    created_by: Option<String>,
    created_at: i64,
}

#[derive(Debug, FromRow)]
struct LinkRow {
    assignment_id: String,
    id: String,
    name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AssignmentView {
    pub id: String,
    pub series_id: String,
    pub representative_id: String,
    pub representative_name: Option<String>,
    pub weekday: Weekday,
    pub scheduled_on: Date,
    pub note: Option<String>,
    pub status: Status,
    pub created_by: Option<String>,
    pub created_at: i64,
    pub doctors: Vec<Link>,
    pub products: Vec<Link>,
}

impl AssignmentView {
    pub fn doctor_ids(&self) -> Vec<&str> {
        self.doctors.iter().map(|l| l.id.as_str()).collect()
    }

    pub fn product_ids(&self) -> Vec<&str> {
        self.products.iter().map(|l| l.id.as_str()).collect()
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == Status::Scheduled
    }
}

impl TryFrom<AssignmentRow> for AssignmentView {
    type Error = repdesk_shared::Error;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        let Some(weekday) = weekday_from_index(row.weekday) else {
            return Err(repdesk_shared::Error::Malformed(format!(
                "assignment {} weekday {}",
                row.id, row.weekday
            )));
        };

        let scheduled_on = Date::from_julian_day(row.scheduled_on).map_err(|err| {
            repdesk_shared::Error::Malformed(format!("assignment {} scheduled_on: {err}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            series_id: row.series_id,
            representative_id: row.representative_id,
            representative_name: row.representative_name,
            weekday,
            scheduled_on,
            note: row.note,
            status: row.status.0,
            created_by: row.created_by,
            created_at: row.created_at,
            doctors: vec![],
            products: vec![],
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct AssignmentFilter {
    pub representative_id: Option<String>,
    pub series_id: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub status: Option<Status>,
}

fn select() -> SelectStatement {
    sea_query::Query::select()
        .columns([
            (Assignment::Table, Assignment::Id),
            (Assignment::Table, Assignment::SeriesId),
            (Assignment::Table, Assignment::RepresentativeId),
            (Assignment::Table, Assignment::Weekday),
            (Assignment::Table, Assignment::ScheduledOn),
            (Assignment::Table, Assignment::Note),
            (Assignment::Table, Assignment::Status),
            (Assignment::Table, Assignment::CreatedBy),
            (Assignment::Table, Assignment::CreatedAt),
        ])
        .expr_as(
            Expr::col((Representative::Table, Representative::FullName)),
            Alias::new("representative_name"),
        )
        .from(Assignment::Table)
        .join(
            JoinType::LeftJoin,
            Representative::Table,
            Expr::col((Assignment::Table, Assignment::RepresentativeId))
                .equals((Representative::Table, Representative::Id)),
        )
        .to_owned()
}

#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    /// Ordered by date, then id.
    pub async fn list(
        &self,
        filter: AssignmentFilter,
    ) -> repdesk_shared::Result<Vec<AssignmentView>> {
        let mut statement = select()
            .order_by((Assignment::Table, Assignment::ScheduledOn), Order::Asc)
            .order_by((Assignment::Table, Assignment::Id), Order::Asc)
            .to_owned();

        if let Some(representative_id) = filter.representative_id {
            statement.and_where(
                Expr::col((Assignment::Table, Assignment::RepresentativeId)).eq(representative_id),
            );
        }

        if let Some(series_id) = filter.series_id {
            statement.and_where(Expr::col((Assignment::Table, Assignment::SeriesId)).eq(series_id));
        }

        if let Some(from) = filter.from {
            statement.and_where(
                Expr::col((Assignment::Table, Assignment::ScheduledOn)).gte(from.to_julian_day()),
            );
        }

        if let Some(to) = filter.to {
            statement.and_where(
                Expr::col((Assignment::Table, Assignment::ScheduledOn)).lte(to.to_julian_day()),
            );
        }

        if let Some(status) = filter.status {
            statement.and_where(
                Expr::col((Assignment::Table, Assignment::Status)).eq(status.to_string()),
            );
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, AssignmentRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        let mut views = rows
            .into_iter()
            .map(AssignmentView::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        self.load_links(&mut views).await?;

        Ok(views)
    }

    pub async fn find(
        &self,
        id: impl Into<String>,
    ) -> repdesk_shared::Result<Option<AssignmentView>> {
        let statement = select()
            .and_where(Expr::col((Assignment::Table, Assignment::Id)).eq(id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let Some(row) = sqlx::query_as_with::<_, AssignmentRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?
        else {
            return Ok(None);
        };

        let mut views = vec![AssignmentView::try_from(row)?];
        self.load_links(&mut views).await?;

        Ok(views.pop())
    }

    async fn load_links(&self, views: &mut [AssignmentView]) -> repdesk_shared::Result<()> {
        if views.is_empty() {
            return Ok(());
        }

        let ids = views.iter().map(|v| v.id.to_owned()).collect::<Vec<_>>();

        let doctors = sea_query::Query::select()
            .expr_as(
                Expr::col((AssignmentDoctor::Table, AssignmentDoctor::AssignmentId)),
                Alias::new("assignment_id"),
            )
            .expr_as(
                Expr::col((AssignmentDoctor::Table, AssignmentDoctor::DoctorId)),
                Alias::new("id"),
            )
            .expr_as(
                Expr::col((Doctor::Table, Doctor::FullName)),
                Alias::new("name"),
            )
            .from(AssignmentDoctor::Table)
            .join(
                JoinType::LeftJoin,
                Doctor::Table,
                Expr::col((AssignmentDoctor::Table, AssignmentDoctor::DoctorId))
                    .equals((Doctor::Table, Doctor::Id)),
            )
            .and_where(
                Expr::col((AssignmentDoctor::Table, AssignmentDoctor::AssignmentId))
                    .is_in(ids.to_owned()),
            )
            .order_by((Doctor::Table, Doctor::FullName), Order::Asc)
            .to_owned();

        let products = sea_query::Query::select()
            .expr_as(
                Expr::col((AssignmentProduct::Table, AssignmentProduct::AssignmentId)),
                Alias::new("assignment_id"),
            )
            .expr_as(
                Expr::col((AssignmentProduct::Table, AssignmentProduct::ProductId)),
                Alias::new("id"),
            )
            .expr_as(Expr::col((Product::Table, Product::Name)), Alias::new("name"))
            .from(AssignmentProduct::Table)
            .join(
                JoinType::LeftJoin,
                Product::Table,
                Expr::col((AssignmentProduct::Table, AssignmentProduct::ProductId))
                    .equals((Product::Table, Product::Id)),
            )
            .and_where(
                Expr::col((AssignmentProduct::Table, AssignmentProduct::AssignmentId)).is_in(ids),
            )
            .order_by((Product::Table, Product::Name), Order::Asc)
            .to_owned();

        let mut doctors = self.fetch_links(doctors).await?;
        let mut products = self.fetch_links(products).await?;

        for view in views.iter_mut() {
            view.doctors = doctors.remove(&view.id).unwrap_or_default();
            view.products = products.remove(&view.id).unwrap_or_default();
        }

        Ok(())
    }

    async fn fetch_links(
        &self,
        statement: SelectStatement,
    ) -> repdesk_shared::Result<HashMap<String, Vec<Link>>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, LinkRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        let mut links: HashMap<String, Vec<Link>> = HashMap::new();
        for row in rows {
            links.entry(row.assignment_id).or_default().push(Link {
                id: row.id,
                name: row.name,
            });
        }

        Ok(links)
    }
}
