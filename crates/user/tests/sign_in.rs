use repdesk_shared::{Metadata, user::Role};
use repdesk_user::SignInInput;
use temp_dir::TempDir;

mod helpers;

fn input(email: &str, password: &str) -> SignInInput {
    SignInInput {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

#[tokio::test]
async fn test_sign_in_failure() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = repdesk_user::Command(state);

    let resp = cmd
        .sign_in(input("john.doe@repdesk.localhost", "my_password"))
        .await;
    assert_eq!(resp.unwrap_err().to_string(), "Invalid email or password");

    let user = helpers::create_user(&cmd, "john.doe", Role::Rep).await?;

    let resp = cmd
        .sign_in(input("john.doe@repdesk.localhost", "my_password3"))
        .await;
    assert_eq!(resp.unwrap_err().to_string(), "Invalid email or password");

    let resp = cmd
        .sign_in(input("john.doe@repdesk.localhos", "my_password"))
        .await;
    assert_eq!(resp.unwrap_err().to_string(), "Invalid email or password");

    let resp = cmd.sign_in(input("not an email", "my_password")).await;
    assert_eq!(resp.unwrap_err().to_string(), "Invalid email or password");

    let account = cmd
        .sign_in(input("John.Doe@repdesk.localhost", "my_password"))
        .await?;
    assert_eq!(account.id, user);
    assert_eq!(account.role, Role::Rep);

    Ok(())
}

#[tokio::test]
async fn test_sign_in_suspended() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = repdesk_user::Command(state);
    let admin = helpers::create_user(&cmd, "admin", Role::SuperAdmin).await?;
    let user = helpers::create_user(&cmd, "john.doe", Role::Rep).await?;

    cmd.suspend(&user, &Metadata::by(&admin)).await?;

    let resp = cmd
        .sign_in(input("john.doe@repdesk.localhost", "my_password"))
        .await;
    assert_eq!(resp.unwrap_err().to_string(), "Account suspended");

    cmd.activate(&user, &Metadata::by(&admin)).await?;

    let account = cmd
        .sign_in(input("john.doe@repdesk.localhost", "my_password"))
        .await?;
    assert_eq!(account.id, user);

    Ok(())
}
