use repdesk_assignment::{AssignmentFilter, AssignmentForm, Status, build_assignment_request};
use repdesk_shared::Metadata;
use temp_dir::TempDir;
use time::{Weekday, macros::date};

mod helpers;

fn form(fixture: &helpers::Fixture, repeat_count: i64) -> AssignmentForm {
    AssignmentForm {
        representative_id: fixture.representative.to_owned(),
        doctor_ids: fixture.doctors.to_owned(),
        product_ids: fixture.products.to_owned(),
        weekday: Some(1),
        repeat_count: Some(repeat_count),
        note: Some("Bring samples".to_owned()),
    }
}

#[tokio::test]
async fn test_submit_four_weeks() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let fixture = helpers::create_fixture(&state, "Jane").await?;
    let command = repdesk_assignment::Command(state.clone());
    let query = repdesk_assignment::Query(state.read_db.clone());

    let request = build_assignment_request(&form(&fixture, 4), date!(2024 - 01 - 03))?;
    let series_id = command.submit(&request, &Metadata::by("admin")).await?;

    let assignments = query.list(AssignmentFilter::default()).await?;
    assert_eq!(
        assignments.iter().map(|a| a.scheduled_on).collect::<Vec<_>>(),
        vec![
            date!(2024 - 01 - 08),
            date!(2024 - 01 - 15),
            date!(2024 - 01 - 22),
            date!(2024 - 01 - 29),
        ]
    );

    for assignment in assignments.iter() {
        assert_eq!(assignment.series_id, series_id);
        assert_eq!(assignment.weekday, Weekday::Monday);
        assert_eq!(assignment.status, Status::Scheduled);
        assert_eq!(assignment.note.as_deref(), Some("Bring samples"));
        assert_eq!(assignment.created_by.as_deref(), Some("admin"));
        assert_eq!(assignment.representative_name.as_deref(), Some("Jane"));
        assert_eq!(assignment.doctor_ids(), fixture.doctors);
        assert_eq!(assignment.product_ids(), fixture.products);
    }

    let found = query.find(&assignments[2].id).await?.unwrap();
    assert_eq!(found.scheduled_on, date!(2024 - 01 - 22));
    assert_eq!(
        found.doctors.iter().filter_map(|d| d.name.as_deref()).collect::<Vec<_>>(),
        vec!["Dr Grey", "Dr House"]
    );

    Ok(())
}

#[tokio::test]
async fn test_submit_unknown_doctor_writes_nothing() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let fixture = helpers::create_fixture(&state, "Jane").await?;
    let command = repdesk_assignment::Command(state.clone());
    let query = repdesk_assignment::Query(state.read_db.clone());

    let mut form = form(&fixture, 2);
    form.doctor_ids.push("missing".to_owned());
    let request = build_assignment_request(&form, date!(2024 - 01 - 03))?;

    let resp = command.submit(&request, &Metadata::system()).await;
    assert_eq!(
        resp.unwrap_err().to_string(),
        "One of the selected doctors does not exist"
    );
    assert!(query.list(AssignmentFilter::default()).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_list_filters() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let jane = helpers::create_fixture(&state, "Jane").await?;
    let adam = helpers::create_fixture(&state, "Adam").await?;
    let command = repdesk_assignment::Command(state.clone());
    let query = repdesk_assignment::Query(state.read_db.clone());
    let today = date!(2024 - 01 - 03);

    let jane_series = command
        .submit(
            &build_assignment_request(&form(&jane, 8), today)?,
            &Metadata::system(),
        )
        .await?;
    command
        .submit(
            &build_assignment_request(&form(&adam, 2), today)?,
            &Metadata::system(),
        )
        .await?;

    let mine = query
        .list(AssignmentFilter {
            representative_id: Some(adam.representative.to_owned()),
            ..Default::default()
        })
        .await?;
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|a| a.representative_id == adam.representative));

    let january = query
        .list(AssignmentFilter {
            series_id: Some(jane_series.to_owned()),
            from: Some(date!(2024 - 01 - 10)),
            to: Some(date!(2024 - 01 - 31)),
            ..Default::default()
        })
        .await?;
    assert_eq!(
        january.iter().map(|a| a.scheduled_on).collect::<Vec<_>>(),
        vec![
            date!(2024 - 01 - 15),
            date!(2024 - 01 - 22),
            date!(2024 - 01 - 29),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_status_and_delete_series() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let fixture = helpers::create_fixture(&state, "Jane").await?;
    let command = repdesk_assignment::Command(state.clone());
    let query = repdesk_assignment::Query(state.read_db.clone());
    let directory = repdesk_directory::Directory(state.clone());

    let series_id = command
        .submit(
            &build_assignment_request(&form(&fixture, 2), date!(2024 - 01 - 03))?,
            &Metadata::system(),
        )
        .await?;
    let assignments = query.list(AssignmentFilter::default()).await?;

    command
        .set_status(&assignments[0].id, Status::Completed, &Metadata::system())
        .await?;
    let completed = query
        .list(AssignmentFilter {
            status: Some(Status::Completed),
            ..Default::default()
        })
        .await?;
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, assignments[0].id);

    let resp = command
        .set_status("missing", Status::Cancelled, &Metadata::system())
        .await;
    assert!(matches!(resp, Err(repdesk_shared::Error::NotFound(_))));

    let resp = directory.delete_doctor(&fixture.doctors[0]).await;
    assert!(matches!(resp, Err(repdesk_shared::Error::User(_))));

    assert_eq!(
        command.delete_series(&series_id, &Metadata::system()).await?,
        2
    );
    assert!(query.list(AssignmentFilter::default()).await?.is_empty());

    directory.delete_doctor(&fixture.doctors[0]).await?;
    directory.delete_product(&fixture.products[0]).await?;
    directory
        .delete_representative(&fixture.representative)
        .await?;

    let resp = command.delete_series(&series_id, &Metadata::system()).await;
    assert!(matches!(resp, Err(repdesk_shared::Error::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_delete_doctor_and_submit_never_both_succeed() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_server_state(dir.child("db.sqlite3")).await?;
    let fixture = helpers::create_fixture(&state, "Jane").await?;
    let command = repdesk_assignment::Command(state.clone());
    let directory = repdesk_directory::Directory(state.clone());

    for round in 0..20 {
        let doctor = directory
            .create_doctor(repdesk_directory::DoctorInput {
                full_name: format!("Dr Round {round}"),
                ..Default::default()
            })
            .await?;
        let request = build_assignment_request(
            &AssignmentForm {
                doctor_ids: vec![doctor.to_owned()],
                ..form(&fixture, 1)
            },
            date!(2024 - 01 - 03),
        )?;

        let metadata = Metadata::system();
        let (deleted, submitted) = tokio::join!(
            directory.delete_doctor(&doctor),
            command.submit(&request, &metadata)
        );
        assert!(
            deleted.is_ok() != submitted.is_ok(),
            "round {round}: delete {deleted:?}, submit {submitted:?}"
        );
    }

    let (orphans,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM assignment_doctor WHERE doctor_id NOT IN (SELECT id FROM doctor)",
    )
    .fetch_one(&state.read_db)
    .await?;
    assert_eq!(orphans, 0);

    Ok(())
}
