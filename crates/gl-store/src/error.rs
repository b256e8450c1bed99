//! Error types for the ladder repository.

use rusqlite::ffi;
use thiserror::Error;

/// Which database constraint a write breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    PrimaryKey,
    ForeignKey,
    NotNull,
    Check,
    Other,
}

impl ConstraintKind {
    /// Classify a SQLite extended result code.
    pub fn from_extended_code(code: i32) -> Self {
        match code {
            ffi::SQLITE_CONSTRAINT_UNIQUE => ConstraintKind::Unique,
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY => ConstraintKind::PrimaryKey,
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
            ffi::SQLITE_CONSTRAINT_NOTNULL => ConstraintKind::NotNull,
            ffi::SQLITE_CONSTRAINT_CHECK => ConstraintKind::Check,
            _ => ConstraintKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::PrimaryKey => "primary key",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::NotNull => "not null",
            ConstraintKind::Check => "check",
            ConstraintKind::Other => "constraint",
        }
    }
}

/// Repository errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open or configure the database (L001).
    #[error("[L001] Ladder database connection failed: {0}")]
    ConnectionError(String),

    /// Schema migration failed (L002).
    #[error("[L002] Ladder database migration failed: {0}")]
    MigrationError(String),

    /// SQL execution error (L003).
    #[error("[L003] Ladder database query failed: {0}")]
    QueryError(String),

    /// Transaction management error (L004).
    #[error("[L004] Ladder database transaction failed: {0}")]
    TransactionError(String),

    /// Uniqueness, primary-key, or referential-integrity breach (L005).
    #[error("[L005] {} constraint violated: {detail}", kind.as_str())]
    ConstraintViolation { kind: ConstraintKind, detail: String },

    /// Lookup by ID or key with no match (L006).
    #[error("[L006] {entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Attempt to replace a non-null external identifier (L007).
    #[error("[L007] {column} of row {row_id} is already {existing}, refusing to set {attempted}")]
    IntegrityConflict {
        column: String,
        row_id: i64,
        existing: String,
        attempted: String,
    },

    /// Soft reference that resolves to nothing under the reject policy (L008).
    #[error("[L008] Dangling {reference} reference: '{code}' does not exist")]
    DanglingReference { reference: &'static str, code: String },

    /// Caller-supplied data rejected before touching the database (L009).
    #[error("[L009] Invalid input: {0}")]
    InvalidInput(String),

    /// Trace archive read or write failed (L010).
    #[error("[L010] Trace archive error at '{path}': {source}")]
    ArchiveError {
        path: String,
        source: std::io::Error,
    },

    /// SQLite driver error with preserved source chain (L011).
    #[error("[L011] SQLite error")]
    Sqlite(#[source] rusqlite::Error),
}

/// Result type alias for [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Whether this is a unique or primary-key breach, the signal that a
    /// concurrent writer created the same natural key first.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StoreError::ConstraintViolation {
                kind: ConstraintKind::Unique | ConstraintKind::PrimaryKey,
                ..
            }
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StoreError::ConstraintViolation {
                kind: ConstraintKind::ForeignKey,
                ..
            }
        )
    }

    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

/// Constraint failures keep their classification; everything else is wrapped.
fn classify(err: rusqlite::Error, context: Option<&str>) -> StoreError {
    if let rusqlite::Error::SqliteFailure(ffi_err, msg) = &err {
        if ffi_err.code == rusqlite::ErrorCode::ConstraintViolation {
            let message = msg.clone().unwrap_or_else(|| ffi_err.to_string());
            let detail = match context {
                Some(ctx) => format!("{ctx}: {message}"),
                None => message,
            };
            return StoreError::ConstraintViolation {
                kind: ConstraintKind::from_extended_code(ffi_err.extended_code),
                detail,
            };
        }
    }
    match context {
        Some(ctx) => StoreError::QueryError(format!("{ctx}: {err}")),
        None => StoreError::Sqlite(err),
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        classify(err, None)
    }
}

/// Attach a short description of the failing statement to driver errors.
pub(crate) trait StoreResultExt<T> {
    fn query_context(self, context: &str) -> StoreResult<T>;
}

impl<T> StoreResultExt<T> for Result<T, rusqlite::Error> {
    fn query_context(self, context: &str) -> StoreResult<T> {
        self.map_err(|e| classify(e, Some(context)))
    }
}
