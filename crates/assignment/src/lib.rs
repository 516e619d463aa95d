mod command;
mod query;
mod request;
mod schedule;

pub use command::*;
pub use query::*;
pub use request::*;
pub use schedule::*;

use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};

#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Deserialize,
)]
pub enum Status {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Scheduled => "Scheduled",
            Status::Completed => "Completed",
            Status::Cancelled => "Cancelled",
        }
    }
}
