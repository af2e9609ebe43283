use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite failure. Surfaced to callers as a
    /// report-unavailable condition; reports never render from stale data.
    Sqlite(rusqlite::Error),
    /// Malformed hierarchy entry rejected at write time.
    InvalidMapping(String),
    /// Empty or unusable expense category name.
    InvalidCategory(String),
    /// A stored date column failed to parse.
    DateParse { column: String, value: String },
    /// A required key column was blank.
    EmptyKey(&'static str),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(e) => write!(f, "store error: {e}"),
            Self::InvalidMapping(msg) => write!(f, "invalid mapping: {msg}"),
            Self::InvalidCategory(msg) => write!(f, "invalid category: {msg}"),
            Self::DateParse { column, value } => {
                write!(f, "column '{column}': cannot parse date '{value}'")
            }
            Self::EmptyKey(column) => write!(f, "{column} is required"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e)
    }
}
