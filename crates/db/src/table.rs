use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum User {
    Table,
    Id,
    Email,
    Password,
    FullName,
    Role,
    State,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Representative {
    Table,
    Id,
    FullName,
    Email,
    Phone,
    Territory,
    UserId,
    ManagerId,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Clinic {
    Table,
    Id,
    Name,
    Address,
    City,
    Phone,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Doctor {
    Table,
    Id,
    FullName,
    Specialty,
    Email,
    Phone,
    ClinicId,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Brand {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Product {
    Table,
    Id,
    Name,
    Description,
    BrandId,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Assignment {
    Table,
    Id,
    SeriesId,
    RepresentativeId,
    Weekday,
    ScheduledOn,
    Note,
    Status,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum AssignmentDoctor {
    Table,
    AssignmentId,
    DoctorId,
}

#[derive(Iden, Clone)]
pub enum AssignmentProduct {
    Table,
    AssignmentId,
    ProductId,
}
