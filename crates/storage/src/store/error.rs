#![forbid(unsafe_code)]

/// Boundary failures for range removal. Unlike insert/move positions, which
/// are clamped, a range is a user-chosen span and each bad bound is reported
/// by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeBoundError {
    FromNotPositive,
    ToNotPositive,
    FromBeyondEnd,
    ToBeyondEnd,
    ToBeforeFrom,
}

impl RangeBoundError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::FromNotPositive => "from position must be greater than zero",
            Self::ToNotPositive => "to position must be greater than zero",
            Self::FromBeyondEnd => "from position must not exceed the number of rows in the form",
            Self::ToBeyondEnd => "to position must not exceed the number of rows in the form",
            Self::ToBeforeFrom => "to position must not be less than the from position",
        }
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    Json(serde_json::Error),
    InvalidInput(&'static str),
    UnknownForm,
    UnknownRow,
    UnknownTemplate,
    NotAnIncludeRow,
    IncludeTargetMissing,
    IncludeCycle,
    RangeBound(RangeBoundError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::Json(err) => write!(f, "payload json: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::UnknownForm => write!(f, "unknown form"),
            Self::UnknownRow => write!(f, "unknown row"),
            Self::UnknownTemplate => write!(f, "unknown template"),
            Self::NotAnIncludeRow => write!(f, "row is not an include row"),
            Self::IncludeTargetMissing => write!(f, "include row has no target template"),
            Self::IncludeCycle => write!(f, "template inclusion cycle"),
            Self::RangeBound(bound) => write!(f, "range bound: {}", bound.message()),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
