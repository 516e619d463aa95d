use argon2::{Argon2, PasswordHash, PasswordVerifier};
use repdesk_shared::user::State;
use validator::Validate;

use crate::repository::{self, FindType};

#[derive(Validate)]
pub struct SignInInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl super::Command {
    pub async fn sign_in(&self, input: SignInInput) -> repdesk_shared::Result<super::Account> {
        if input.validate().is_err() {
            repdesk_shared::user!("Invalid email or password");
        }

        let Some(row) = repository::find(&self.read_db, FindType::Email(input.email)).await?
        else {
            repdesk_shared::user!("Invalid email or password");
        };

        let parsed_hash = PasswordHash::new(&row.password)?;
        let argon2 = Argon2::default();

        if argon2
            .verify_password(input.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            repdesk_shared::user!("Invalid email or password");
        }

        if row.state.0 == State::Suspended {
            repdesk_shared::user!("Account suspended");
        }

        tracing::info!(user_id = %row.id, "signed in");

        Ok(row.into())
    }
}
