use repdesk_db::table::{AssignmentDoctor, Clinic, Doctor as DoctorTable};
use sea_query::{
    Alias, Expr, ExprTrait, Func, JoinType, Order, Query, SelectStatement, SqliteQueryBuilder,
};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::{SqliteConnection, prelude::FromRow};
use validator::Validate;

use crate::optional;

#[derive(Debug, Clone, FromRow)]
pub struct Doctor {
    pub id: String,
    pub full_name: String,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub clinic_id: Option<String>,
    pub clinic_name: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct DoctorInput {
    #[validate(length(min = 1, max = 120, message = "must be 1 to 120 characters"))]
    pub full_name: String,
    #[validate(length(max = 80))]
    pub specialty: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub clinic_id: Option<String>,
}

impl DoctorInput {
    fn normalized(self) -> Self {
        Self {
            full_name: self.full_name.trim().to_owned(),
            specialty: optional(self.specialty),
            email: optional(self.email),
            phone: optional(self.phone),
            clinic_id: optional(self.clinic_id),
        }
    }
}

fn select() -> SelectStatement {
    Query::select()
        .columns([
            (DoctorTable::Table, DoctorTable::Id),
            (DoctorTable::Table, DoctorTable::FullName),
            (DoctorTable::Table, DoctorTable::Specialty),
            (DoctorTable::Table, DoctorTable::Email),
            (DoctorTable::Table, DoctorTable::Phone),
            (DoctorTable::Table, DoctorTable::ClinicId),
            (DoctorTable::Table, DoctorTable::CreatedAt),
        ])
        .expr_as(
            Expr::col((Clinic::Table, Clinic::Name)),
            Alias::new("clinic_name"),
        )
        .from(DoctorTable::Table)
        .join(
            JoinType::LeftJoin,
            Clinic::Table,
            Expr::col((DoctorTable::Table, DoctorTable::ClinicId))
                .equals((Clinic::Table, Clinic::Id)),
        )
        .order_by((DoctorTable::Table, DoctorTable::FullName), Order::Asc)
        .order_by((DoctorTable::Table, DoctorTable::Id), Order::Asc)
        .to_owned()
}

impl super::Directory {
    pub async fn list_doctors(&self) -> repdesk_shared::Result<Vec<Doctor>> {
        self.fetch_doctors(select()).await
    }

    pub async fn count_doctors(&self) -> repdesk_shared::Result<i64> {
        let statement = Query::select()
            .expr(Func::count(Expr::col(DoctorTable::Id)))
            .from(DoctorTable::Table)
            .to_owned();

        crate::count(&self.read_db, statement).await
    }

    pub async fn doctors_by_clinic(
        &self,
        clinic_id: impl Into<String>,
    ) -> repdesk_shared::Result<Vec<Doctor>> {
        let statement = select()
            .and_where(Expr::col((DoctorTable::Table, DoctorTable::ClinicId)).eq(clinic_id.into()))
            .to_owned();

        self.fetch_doctors(statement).await
    }

    pub async fn find_doctor(&self, id: impl Into<String>) -> repdesk_shared::Result<Option<Doctor>> {
        let statement = select()
            .and_where(Expr::col((DoctorTable::Table, DoctorTable::Id)).eq(id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Doctor, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    async fn fetch_doctors(&self, statement: SelectStatement) -> repdesk_shared::Result<Vec<Doctor>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Doctor, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    async fn check_doctor_input(
        conn: &mut SqliteConnection,
        input: &DoctorInput,
    ) -> repdesk_shared::Result<()> {
        if let Some(clinic_id) = input.clinic_id.as_deref() {
            if !crate::clinic::clinic_exists(conn, clinic_id).await? {
                repdesk_shared::user!("Selected clinic does not exist");
            }
        }

        Ok(())
    }

    pub async fn create_doctor(&self, input: DoctorInput) -> repdesk_shared::Result<String> {
        let input = input.normalized();
        input.validate()?;

        let mut tx = self.write_db.begin().await?;
        Self::check_doctor_input(&mut *tx, &input).await?;

        let id = repdesk_shared::new_id();
        let statement = Query::insert()
            .into_table(DoctorTable::Table)
            .columns([
                DoctorTable::Id,
                DoctorTable::FullName,
                DoctorTable::Specialty,
                DoctorTable::Email,
                DoctorTable::Phone,
                DoctorTable::ClinicId,
                DoctorTable::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                input.full_name.into(),
                input.specialty.into(),
                input.email.into(),
                input.phone.into(),
                input.clinic_id.into(),
                crate::now().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        tx.commit().await?;

        tracing::info!(doctor_id = %id, "doctor created");

        Ok(id)
    }

    pub async fn update_doctor(
        &self,
        id: impl Into<String>,
        input: DoctorInput,
    ) -> repdesk_shared::Result<()> {
        let input = input.normalized();
        input.validate()?;

        let mut tx = self.write_db.begin().await?;
        Self::check_doctor_input(&mut *tx, &input).await?;

        let statement = Query::update()
            .table(DoctorTable::Table)
            .values([
                (DoctorTable::FullName, input.full_name.into()),
                (DoctorTable::Specialty, input.specialty.into()),
                (DoctorTable::Email, input.email.into()),
                (DoctorTable::Phone, input.phone.into()),
                (DoctorTable::ClinicId, input.clinic_id.into()),
            ])
            .and_where(Expr::col(DoctorTable::Id).eq(id.into()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            repdesk_shared::not_found!("doctor");
        }

        tx.commit().await?;

        Ok(())
    }

    /// Refused while any assignment still visits the doctor.
    pub async fn delete_doctor(&self, id: impl Into<String>) -> repdesk_shared::Result<()> {
        let id = id.into();
        let mut tx = self.write_db.begin().await?;

        let statement = Query::select()
            .expr(Func::count(Expr::col(AssignmentDoctor::AssignmentId)))
            .from(AssignmentDoctor::Table)
            .and_where(Expr::col(AssignmentDoctor::DoctorId).eq(id.to_owned()))
            .to_owned();

        if crate::count(&mut *tx, statement).await? > 0 {
            repdesk_shared::user!("Doctor is still linked to assignments");
        }

        let statement = Query::delete()
            .from_table(DoctorTable::Table)
            .and_where(Expr::col(DoctorTable::Id).eq(id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            repdesk_shared::not_found!("doctor");
        }

        tx.commit().await?;

        tracing::info!(doctor_id = %id, "doctor deleted");

        Ok(())
    }
}
