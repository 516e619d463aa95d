use std::ops::Deref;

use repdesk_shared::user::{Role, State};

use crate::repository::{self, FindType, UserRow};

mod register;
mod role;
mod sign_in;
mod suspend;

pub use register::RegisterInput;
pub use sign_in::SignInInput;

#[derive(Clone)]
pub struct Command(pub repdesk_shared::State);

impl Deref for Command {
    type Target = repdesk_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    /// Reads from the write pool so a change is visible to the caller right away.
    async fn load(&self, id: impl Into<String>) -> repdesk_shared::Result<Option<UserRow>> {
        repository::find(&self.write_db, FindType::Id(id.into())).await
    }
}

/// Account as handed to the session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub state: State,
}

impl From<UserRow> for Account {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            role: row.role.0,
            state: row.state.0,
        }
    }
}
