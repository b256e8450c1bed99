//! Task definitions: ordered turnpoint codes under a task ID.
//!
//! A task is stored as one `task` row per leg keyed by `(id, turnpoint_index)`,
//! index 0 being the start and the highest index the finish. Tasks are
//! write-once: a corrected route gets a new ID.

use crate::error::{StoreError, StoreResult, StoreResultExt};
use crate::reference::check_soft_reference;
use crate::reference::turnpoint::turnpoint_exists;
use crate::row_helpers::get_parsed;
use gl_core::{DanglingReferencePolicy, TurnpointCode};
use rusqlite::Connection;

/// Identifier shared by all legs of one task.
pub type TaskId = i64;

/// Insert every leg of task `task_id` in route order.
///
/// Call inside a transaction (see [`crate::LadderDb::define_task`]) so other
/// readers never observe a partially defined task. Fails with a primary-key
/// [`StoreError::ConstraintViolation`] if `task_id` is already defined.
pub fn define_task(
    conn: &Connection,
    policy: DanglingReferencePolicy,
    task_id: TaskId,
    codes: &[TurnpointCode],
) -> StoreResult<()> {
    if codes.is_empty() {
        return Err(StoreError::InvalidInput(format!(
            "task {task_id} must have at least one turnpoint"
        )));
    }

    for code in codes {
        let exists = turnpoint_exists(conn, code)?;
        check_soft_reference(policy, "task turnpoint", code.as_str(), exists)?;
    }

    let mut stmt = conn
        .prepare("INSERT INTO task (id, turnpoint_index, turnpoint_code) VALUES (?1, ?2, ?3)")
        .query_context("prepare insert task")?;
    for (index, code) in codes.iter().enumerate() {
        stmt.execute(rusqlite::params![task_id, index as i64, code.as_str()])
            .query_context("insert task")?;
    }

    log::debug!("Defined task {task_id} with {} turnpoints", codes.len());
    Ok(())
}

/// Turnpoint codes of task `task_id` ordered by leg index.
///
/// An unknown task is [`StoreError::NotFound`], never an empty route.
pub fn get_task(conn: &Connection, task_id: TaskId) -> StoreResult<Vec<TurnpointCode>> {
    let mut stmt = conn
        .prepare("SELECT turnpoint_code FROM task WHERE id = ?1 ORDER BY turnpoint_index")
        .query_context("prepare select task")?;

    let codes: Vec<TurnpointCode> = stmt
        .query_map([task_id], |row| get_parsed(row, 0))
        .query_context("query task")?
        .collect::<Result<Vec<_>, _>>()
        .query_context("collect task")?;

    if codes.is_empty() {
        return Err(StoreError::not_found("task", task_id));
    }
    Ok(codes)
}

/// Whether any leg exists for `task_id`.
pub fn task_exists(conn: &Connection, task_id: TaskId) -> StoreResult<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM task WHERE id = ?1)",
        [task_id],
        |row| row.get(0),
    )
    .query_context("check task exists")
}

/// The next unused task ID: one past the highest defined, 0 when none.
pub fn next_task_id(conn: &Connection) -> StoreResult<TaskId> {
    conn.query_row("SELECT COALESCE(MAX(id) + 1, 0) FROM task", [], |row| row.get(0))
        .query_context("select next task id")
}

/// Allocate a fresh task ID and define the task under it.
///
/// Run inside an immediate transaction so the allocation and the insert are
/// not interleaved with another writer.
pub fn define_new_task(
    conn: &Connection,
    policy: DanglingReferencePolicy,
    codes: &[TurnpointCode],
) -> StoreResult<TaskId> {
    let task_id = next_task_id(conn)?;
    define_task(conn, policy, task_id, codes)?;
    Ok(task_id)
}

#[cfg(test)]
#[path = "task_test.rs"]
mod tests;
