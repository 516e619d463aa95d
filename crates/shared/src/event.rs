use ulid::Ulid;

/// Who triggered a write, recorded on the rows it creates.
#[derive(Clone, Debug, Default)]
pub struct Metadata {
    pub id: String,
    pub requested_by: Option<String>,
}

impl Metadata {
    pub fn by(requested_by: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            requested_by: Some(requested_by.into()),
        }
    }

    pub fn system() -> Self {
        Self {
            id: Ulid::new().to_string(),
            requested_by: None,
        }
    }
}

pub fn new_id() -> String {
    Ulid::new().to_string()
}
