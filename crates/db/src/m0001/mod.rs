mod assignment;
mod assignment_doctor;
mod assignment_product;
mod brand;
mod clinic;
mod doctor;
mod product;
mod representative;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "repdesk",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateUk1,
        clinic::CreateTable,
        brand::CreateTable,
        doctor::CreateTable,
        doctor::CreateIdx1,
        product::CreateTable,
        product::CreateIdx1,
        representative::CreateTable,
        representative::CreateIdx1,
        representative::CreateIdx2,
        assignment::CreateTable,
        assignment::CreateIdx1,
        assignment::CreateIdx2,
        assignment_doctor::CreateTable,
        assignment_doctor::CreateIdx1,
        assignment_product::CreateTable,
        assignment_product::CreateIdx1
    ]
);
