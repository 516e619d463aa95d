use repdesk_directory::{Directory, DoctorInput};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_doctor_references_existing_clinic() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let directory = Directory(state);

    let resp = directory
        .create_doctor(DoctorInput {
            full_name: "Dr House".to_owned(),
            clinic_id: Some("missing".to_owned()),
            ..Default::default()
        })
        .await;
    assert_eq!(
        resp.unwrap_err().to_string(),
        "Selected clinic does not exist"
    );

    let resp = directory
        .create_doctor(DoctorInput {
            full_name: "Dr House".to_owned(),
            email: Some("not-an-email".to_owned()),
            ..Default::default()
        })
        .await;
    assert_eq!(
        resp.unwrap_err().user_message(),
        "email must be a valid email"
    );

    let id = directory
        .create_doctor(DoctorInput {
            full_name: "Dr House".to_owned(),
            email: Some("".to_owned()),
            clinic_id: Some("".to_owned()),
            ..Default::default()
        })
        .await?;
    let doctor = directory.find_doctor(&id).await?.unwrap();
    assert_eq!(doctor.email, None);
    assert_eq!(doctor.clinic_id, None);

    Ok(())
}

#[tokio::test]
async fn test_delete_doctor_in_use() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let pool = state.write_db.clone();
    let directory = Directory(state);

    let doctor = helpers::create_doctor(&directory, "Dr House", None).await?;
    sqlx::query("INSERT INTO assignment_doctor (assignment_id, doctor_id) VALUES (?, ?)")
        .bind("01ASSIGNMENT")
        .bind(&doctor)
        .execute(&pool)
        .await?;

    let resp = directory.delete_doctor(&doctor).await;
    assert_eq!(
        resp.unwrap_err().to_string(),
        "Doctor is still linked to assignments"
    );

    sqlx::query("DELETE FROM assignment_doctor")
        .execute(&pool)
        .await?;
    assert_eq!(directory.count_doctors().await?, 1);
    directory.delete_doctor(&doctor).await?;
    assert!(directory.find_doctor(&doctor).await?.is_none());
    assert_eq!(directory.count_doctors().await?, 0);

    Ok(())
}
