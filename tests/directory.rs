use axum::http::StatusCode;
use repdesk_shared::user::Role;

mod helpers;

#[tokio::test]
async fn test_clinic_crud() -> anyhow::Result<()> {
    let test = helpers::setup().await?;
    let manager = test.create_user("manager", Role::Manager).await?;

    let resp = test
        .post(
            "/clinics/new",
            Some(&manager),
            &[("name", " Saint Luc "), ("city", "Lyon"), ("address", "")],
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(helpers::location(&resp), Some("/clinics"));

    let clinics = test.app.directory.list_clinics().await?;
    assert_eq!(clinics.len(), 1);
    assert_eq!(clinics[0].name, "Saint Luc");
    assert_eq!(clinics[0].address, None);

    let id = clinics[0].id.to_owned();
    let body = helpers::body(test.get(&format!("/clinics/{id}/edit"), Some(&manager)).await?).await?;
    assert!(body.contains(r#"value="Saint Luc""#));

    let resp = test
        .post(
            &format!("/clinics/{id}/edit"),
            Some(&manager),
            &[("name", "Saint Luc Nord"), ("city", "Lyon")],
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let clinic = test.app.directory.find_clinic(&id).await?;
    assert_eq!(clinic.map(|c| c.name), Some("Saint Luc Nord".to_owned()));

    let resp = test
        .post(&format!("/clinics/{id}/delete"), Some(&manager), &[])
        .await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(test.app.directory.list_clinics().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_invalid_doctor_rerenders_form() -> anyhow::Result<()> {
    let test = helpers::setup().await?;
    let manager = test.create_user("manager", Role::Manager).await?;

    let resp = test
        .post(
            "/doctors/new",
            Some(&manager),
            &[("full_name", "Dr Grey"), ("email", "not-an-email")],
        )
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = helpers::body(resp).await?;
    assert!(body.contains("must be a valid email"));
    assert!(body.contains(r#"value="Dr Grey""#));
    assert!(test.app.directory.list_doctors().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_missing_record_is_404() -> anyhow::Result<()> {
    let test = helpers::setup().await?;
    let admin = test.create_user("admin", Role::SuperAdmin).await?;

    let resp = test.get("/brands/unknown/edit", Some(&admin)).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test
        .post("/products/unknown/edit", Some(&admin), &[("name", "Aortix")])
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_users_screen_creates_and_suspends() -> anyhow::Result<()> {
    let test = helpers::setup().await?;
    let admin = test.create_user("admin", Role::SuperAdmin).await?;

    let resp = test
        .post(
            "/users",
            Some(&admin),
            &[
                ("full_name", "Jane Field"),
                ("email", "jane@repdesk.localhost"),
                ("password", "short"),
                ("role", "Rep"),
            ],
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(helpers::body(resp).await?.contains("password must be 8 to 64 characters"));

    let resp = test
        .post(
            "/users",
            Some(&admin),
            &[
                ("full_name", "Jane Field"),
                ("email", "jane@repdesk.localhost"),
                ("password", "jane_password"),
                ("role", "Rep"),
            ],
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let jane = test
        .app
        .user_query
        .find_by_email("jane@repdesk.localhost")
        .await?
        .expect("jane exists");
    assert_eq!(jane.role, Role::Rep);

    let resp = test
        .post(&format!("/users/{}/suspend", jane.id), Some(&admin), &[])
        .await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(test.app.user_query.find_session(&jane.id).await?.is_none());

    let resp = test
        .post(&format!("/users/{admin}/suspend"), Some(&admin), &[])
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        helpers::body(resp)
            .await?
            .contains("You cannot suspend your own account")
    );

    Ok(())
}
