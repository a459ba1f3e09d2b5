#![forbid(unsafe_code)]

use jf_storage::StoreError;

/// Tri-state operation result. Domain conditions (validation failures,
/// mutation-denied) are `Invalid` with every message collected; only
/// structural failures travel as `Err` on the surrounding `Result`.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    Invalid(Vec<String>),
}

impl<T> Outcome<T> {
    pub fn invalid(message: impl Into<String>) -> Self {
        Outcome::Invalid(vec![message.into()])
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::Invalid(_) => None,
        }
    }

    pub fn errors(&self) -> &[String] {
        match self {
            Outcome::Ok(_) => &[],
            Outcome::Invalid(errors) => errors,
        }
    }
}

pub type ServiceResult<T> = Result<Outcome<T>, StoreError>;
