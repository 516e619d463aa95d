use repdesk_shared::{Metadata, user::Role};

use crate::repository::{self, UpdateInput};

impl super::Command {
    pub async fn set_role(
        &self,
        id: impl Into<String>,
        role: Role,
        metadata: &Metadata,
    ) -> repdesk_shared::Result<()> {
        let Some(user) = self.load(id).await? else {
            repdesk_shared::not_found!("user");
        };

        if user.role.0 == role {
            return Ok(());
        }

        if metadata.requested_by.as_deref() == Some(user.id.as_str()) {
            repdesk_shared::user!("You cannot change your own role");
        }

        repository::update(
            &self.write_db,
            UpdateInput {
                id: user.id.to_owned(),
                full_name: None,
                password: None,
                role: Some(role),
                state: None,
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, from = %user.role.0, to = %role, "role changed");

        Ok(())
    }
}
