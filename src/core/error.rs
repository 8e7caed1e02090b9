use thiserror::Error;

/// Failure of a whole lineage computation. There is no partial result:
/// generations depend on each other globally, so one bad reference aborts
/// the data set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineageError {
    #[error("{referrer} references `{name}`, which does not exist in this data set")]
    DanglingReference { referrer: String, name: String },

    #[error("cyclic parent/union dependency: {}", path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    #[error("row {row} is malformed: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("name `{name}` is used by both {first} and {second}")]
    DuplicateName { name: String, first: String, second: String },
}

impl LineageError {
    pub fn dangling(referrer: impl Into<String>, name: impl Into<String>) -> Self {
        LineageError::DanglingReference { referrer: referrer.into(), name: name.into() }
    }
}
