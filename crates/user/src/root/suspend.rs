use repdesk_shared::{Metadata, user::State};

use crate::repository::{self, UpdateInput};

impl super::Command {
    pub async fn suspend(
        &self,
        id: impl Into<String>,
        metadata: &Metadata,
    ) -> repdesk_shared::Result<()> {
        self.set_state(id.into(), State::Suspended, metadata).await
    }

    pub async fn activate(
        &self,
        id: impl Into<String>,
        metadata: &Metadata,
    ) -> repdesk_shared::Result<()> {
        self.set_state(id.into(), State::Active, metadata).await
    }

    async fn set_state(
        &self,
        id: String,
        state: State,
        metadata: &Metadata,
    ) -> repdesk_shared::Result<()> {
        let Some(user) = self.load(id).await? else {
            repdesk_shared::not_found!("user");
        };

        if user.state.0 == state {
            return Ok(());
        }

        if metadata.requested_by.as_deref() == Some(user.id.as_str()) {
            repdesk_shared::user!("You cannot suspend your own account");
        }

        repository::update(
            &self.write_db,
            UpdateInput {
                id: user.id.to_owned(),
                full_name: None,
                password: None,
                role: None,
                state: Some(state),
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, state = %state, "user state changed");

        Ok(())
    }
}
