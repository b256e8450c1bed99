//! Shared helpers for reading typed values out of SQLite rows.

use gl_core::LadderId;
use rusqlite::types::Type;
use rusqlite::Row;
use std::str::FromStr;

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Read a TEXT column and parse it into a validated newtype.
pub(crate) fn get_parsed<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| conversion_error(idx, e))
}

/// Nullable variant of [`get_parsed`].
pub(crate) fn get_parsed_opt<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    row.get::<_, Option<String>>(idx)?
        .map(|raw| raw.parse().map_err(|e| conversion_error(idx, e)))
        .transpose()
}

/// Read a nullable `ladder_id` column.
pub(crate) fn get_ladder_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<LadderId>> {
    Ok(row.get::<_, Option<i64>>(idx)?.map(LadderId::new))
}

/// Whether `name` is safe to splice into SQL as an identifier.
pub(crate) fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
