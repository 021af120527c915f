//! Migration error type

/// Migration error type
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration chain is empty")]
    EmptyChain,

    #[error("duplicate revision '{0}'")]
    DuplicateRevision(String),

    #[error("revision '{revision}' points at unknown parent '{parent}'")]
    UnknownParent { revision: String, parent: String },

    #[error("multiple heads present: {}", .0.join(", "))]
    MultipleHeads(Vec<String>),

    #[error("revisions not reachable from the head (cycle?): {}", .0.join(", "))]
    Unreachable(Vec<String>),

    #[error("revision chain loops back at '{0}' and has no root")]
    Cycle(String),

    #[error("can't locate revision '{0}'")]
    UnknownRevision(String),

    #[error("destination '{target}' is behind current revision '{current}'")]
    TargetBehind { target: String, current: String },

    #[error("destination '{target}' is ahead of current revision '{current}'")]
    TargetAhead { target: String, current: String },

    #[error("version table holds {0} rows; expected at most one")]
    CorruptMarker(usize),

    #[error("revision '{revision}' failed: {source}")]
    Script {
        revision: &'static str,
        #[source]
        source: sqlx::Error,
    },
}
