use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use repdesk_shared::{Metadata, user::Role};
use validator::Validate;

use crate::repository::{self, CreateInput, FindType};

#[derive(Validate)]
pub struct RegisterInput {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 8, max = 64, message = "must be 8 to 64 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 80, message = "must be 1 to 80 characters"))]
    pub full_name: String,
    pub role: Role,
}

impl super::Command {
    pub async fn register(
        &self,
        input: RegisterInput,
        metadata: &Metadata,
    ) -> repdesk_shared::Result<String> {
        input.validate()?;

        if repository::find(&self.write_db, FindType::Email(input.email.to_owned()))
            .await?
            .is_some()
        {
            repdesk_shared::user!("Email already exists");
        }

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(input.password.as_bytes(), &salt)?
            .to_string();

        let id = repdesk_shared::new_id();

        repository::create(
            &self.write_db,
            CreateInput {
                id: id.to_owned(),
                email: input.email,
                password: password_hash,
                full_name: input.full_name.trim().to_owned(),
                role: input.role,
            },
        )
        .await?;

        tracing::info!(
            user_id = %id,
            role = %input.role,
            requested_by = ?metadata.requested_by,
            "user registered"
        );

        Ok(id)
    }
}
