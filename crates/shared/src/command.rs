#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("{0}")]
    User(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("forbidden")]
    Forbidden,

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

impl Error {
    /// Message safe to show in a form banner.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validate(errors) => {
                let mut fields = errors.field_errors().into_iter().collect::<Vec<_>>();
                fields.sort_by(|a, b| a.0.cmp(&b.0));

                fields
                    .into_iter()
                    .map(|(field, errs)| {
                        let detail = errs
                            .iter()
                            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                            .next()
                            .unwrap_or_else(|| "is invalid".to_owned());
                        format!("{field} {detail}")
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            }
            Error::User(msg) => msg.to_owned(),
            Error::NotFound(what) => format!("{what} not found"),
            Error::Forbidden => "You are not allowed to do that".to_owned(),
            Error::Malformed(_) | Error::Server(_) | Error::Unknown(_) => {
                "Something went wrong, please retry later".to_owned()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::ColumnDecode { index, source } => {
                Self::Malformed(format!("column {index}: {source}"))
            }
            value => Self::Unknown(value.into()),
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::Unknown(anyhow::anyhow!(value))
    }
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Server(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::Server(format!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Server(format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! user {
    ($($arg:tt)*) => {
        return Err($crate::Error::User(format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! not_found {
    ($($arg:tt)*) => {
        return Err($crate::Error::NotFound(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Input {
        #[validate(length(min = 1, message = "is required"))]
        name: String,
    }

    #[test]
    fn test_validate_message_names_field() {
        let err: Error = Input {
            name: String::new(),
        }
        .validate()
        .unwrap_err()
        .into();

        assert_eq!(err.user_message(), "name is required");
    }

    #[derive(Validate)]
    struct Contact {
        #[validate(length(min = 1, message = "is required"))]
        phone: String,
        #[validate(email(message = "must be a valid email"))]
        email: String,
        #[validate(length(min = 1, message = "is required"))]
        name: String,
    }

    #[test]
    fn test_validate_message_is_sorted_by_field() {
        let contact = Contact {
            phone: String::new(),
            email: "nope".to_owned(),
            name: String::new(),
        };

        for _ in 0..10 {
            let err: Error = contact.validate().unwrap_err().into();

            assert_eq!(
                err.user_message(),
                "email must be a valid email, name is required, phone is required"
            );
        }
    }

    #[test]
    fn test_column_decode_is_malformed() {
        let err: Error = sqlx::Error::ColumnDecode {
            index: "role".to_owned(),
            source: "Matching variant not found".into(),
        }
        .into();

        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn test_server_errors_are_not_leaked() {
        let err = Error::Unknown(anyhow::anyhow!("database is locked"));

        assert_eq!(
            err.user_message(),
            "Something went wrong, please retry later"
        );
    }
}
