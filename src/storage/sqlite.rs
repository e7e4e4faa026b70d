use crate::{
    domain::{Board, BoardId, Column, ColumnId, PlacementKey, Task, TaskId, Visibility},
    error::{Result, TaskrailError},
    storage::BoardStore,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::str::FromStr;
use tokio::sync::Mutex;

/// SQLite-backed storage.
///
/// All mutations run inside a transaction on a single connection guarded by
/// an async mutex, so concurrent reorder calls serialize: each one reads the
/// destination column, renumbers, and commits as a whole, and can never
/// commit against a stale read. A failed call rolls back with no partial
/// renumbering.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private in-process database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;
        PRAGMA foreign_keys=ON;

        CREATE TABLE IF NOT EXISTS boards (
          id         TEXT PRIMARY KEY,
          name       TEXT NOT NULL,
          visibility TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS columns (
          id             TEXT PRIMARY KEY,
          board_id       TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
          name           TEXT NOT NULL,
          color          TEXT,
          field_template TEXT,
          position       INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tasks (
          id            TEXT PRIMARY KEY,
          board_id      TEXT NOT NULL,
          title         TEXT NOT NULL,
          description   TEXT,
          status        TEXT,
          column_id     TEXT,
          ord           INTEGER NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          CHECK ((status IS NULL) != (column_id IS NULL))
        );

        CREATE INDEX IF NOT EXISTS idx_columns_board ON columns(board_id, position);
        CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status, ord);
        CREATE INDEX IF NOT EXISTS idx_tasks_column ON tasks(column_id, ord);
        "#,
    )?;
    Ok(())
}

/// Raw tasks row; converted to a domain Task outside the rusqlite closure
struct TaskRow {
    id: String,
    board_id: String,
    title: String,
    description: Option<String>,
    status: Option<String>,
    column_id: Option<String>,
    ord: i64,
    created_at_ms: i64,
    updated_at_ms: i64,
}

const TASK_COLUMNS: &str =
    "id, board_id, title, description, status, column_id, ord, created_at_ms, updated_at_ms";

fn read_task_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        board_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: row.get(4)?,
        column_id: row.get(5)?,
        ord: row.get(6)?,
        created_at_ms: row.get(7)?,
        updated_at_ms: row.get(8)?,
    })
}

fn task_from_row(row: TaskRow) -> Result<Task> {
    let placement = match (&row.status, &row.column_id) {
        (Some(status), None) => PlacementKey::Status(status.parse()?),
        (None, Some(column_id)) => PlacementKey::Column(column_id.parse()?),
        _ => {
            return Err(TaskrailError::InvalidPlacementKey(format!(
                "task {} has no placement key",
                row.id
            )))
        }
    };

    Ok(Task {
        id: TaskId::from_str(&row.id)?,
        board_id: row.board_id.parse()?,
        title: row.title,
        description: row.description,
        placement,
        order: row.ord,
        created_at: ms_to_datetime(row.created_at_ms),
        updated_at: ms_to_datetime(row.updated_at_ms),
    })
}

fn ms_to_datetime(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// Splits a placement key into the (status, column_id) column pair
fn placement_columns(placement: &PlacementKey) -> (Option<String>, Option<String>) {
    match placement {
        PlacementKey::Status(status) => (Some(status.as_str().to_string()), None),
        PlacementKey::Column(column_id) => (None, Some(column_id.to_string())),
    }
}

/// SQL filter selecting one placement key's tasks; the key binds as ?1
fn placement_filter(placement: &PlacementKey) -> (&'static str, String) {
    match placement {
        PlacementKey::Status(status) => ("status = ?1", status.as_str().to_string()),
        PlacementKey::Column(column_id) => ("column_id = ?1", column_id.to_string()),
    }
}

#[async_trait]
impl BoardStore for SqliteStore {
    async fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        migrate(&conn)
    }

    async fn save_board(&self, board: &Board) -> Result<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO boards (id, name, visibility) VALUES (?1, ?2, ?3)",
            params![
                board.id.to_string(),
                board.name,
                serde_json::to_string(&board.visibility)?
            ],
        )?;

        tx.execute(
            "DELETE FROM columns WHERE board_id = ?1",
            params![board.id.to_string()],
        )?;
        for column in &board.columns {
            tx.execute(
                "INSERT INTO columns (id, board_id, name, color, field_template, position)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    column.id.to_string(),
                    column.board_id.to_string(),
                    column.name,
                    column.color,
                    column.field_template,
                    column.position as i64
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    async fn load_board(&self, id: BoardId) -> Result<Board> {
        let conn = self.conn.lock().await;

        let board_row: Option<(String, String)> = conn
            .query_row(
                "SELECT name, visibility FROM boards WHERE id = ?1",
                params![id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (name, visibility_json) = board_row.ok_or(TaskrailError::BoardNotInitialized)?;
        let visibility: Visibility = serde_json::from_str(&visibility_json)?;

        let mut stmt = conn.prepare(
            "SELECT id, name, color, field_template, position
             FROM columns WHERE board_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut columns = Vec::new();
        for row in rows {
            let (column_id, name, color, field_template, position) = row?;
            columns.push(Column {
                id: ColumnId::from_str(&column_id)?,
                board_id: id,
                name,
                color,
                field_template,
                position: position as usize,
            });
        }

        Ok(Board {
            id,
            name,
            visibility,
            columns,
        })
    }

    async fn save_task(&self, task: &Task) -> Result<()> {
        let conn = self.conn.lock().await;
        let (status, column_id) = placement_columns(&task.placement);

        conn.execute(
            "INSERT OR REPLACE INTO tasks
             (id, board_id, title, description, status, column_id, ord, created_at_ms, updated_at_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                task.id.to_string(),
                task.board_id.to_string(),
                task.title,
                task.description,
                status,
                column_id,
                task.order,
                task.created_at.timestamp_millis(),
                task.updated_at.timestamp_millis()
            ],
        )?;
        Ok(())
    }

    async fn load_task(&self, id: &TaskId) -> Result<Task> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS),
                params![id.to_string()],
                read_task_row,
            )
            .optional()?;

        match row {
            Some(row) => task_from_row(row),
            None => Err(TaskrailError::TaskNotFound(id.to_string())),
        }
    }

    async fn delete_task(&self, id: &TaskId) -> Result<()> {
        let conn = self.conn.lock().await;
        let affected = conn.execute(
            "DELETE FROM tasks WHERE id = ?1",
            params![id.to_string()],
        )?;
        if affected == 0 {
            return Err(TaskrailError::TaskNotFound(id.to_string()));
        }
        tracing::debug!(task = %id, "deleted task");
        Ok(())
    }

    async fn board_tasks(&self, board_id: BoardId) -> Result<Vec<Task>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE board_id = ?1",
            TASK_COLUMNS
        ))?;
        let rows = stmt.query_map(params![board_id.to_string()], read_task_row)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(task_from_row(row?)?);
        }
        Ok(tasks)
    }

    async fn column_tasks(&self, placement: &PlacementKey) -> Result<Vec<Task>> {
        let conn = self.conn.lock().await;
        let (filter, key) = placement_filter(placement);
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE {} ORDER BY ord, created_at_ms, id",
            TASK_COLUMNS, filter
        ))?;
        let rows = stmt.query_map(params![key], read_task_row)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(task_from_row(row?)?);
        }
        Ok(tasks)
    }

    async fn reorder_task(
        &self,
        task_id: &TaskId,
        placement: &PlacementKey,
        index: usize,
    ) -> Result<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let exists: Option<String> = tx
            .query_row(
                "SELECT id FROM tasks WHERE id = ?1",
                params![task_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(TaskrailError::TaskNotFound(task_id.to_string()));
        }

        // Destination column in display order, without the moved task
        let (filter, key) = placement_filter(placement);
        let mut ids: Vec<String> = {
            let mut stmt = tx.prepare(&format!(
                "SELECT id FROM tasks WHERE {} AND id != ?2 ORDER BY ord, created_at_ms, id",
                filter
            ))?;
            let rows = stmt.query_map(params![key, task_id.to_string()], |row| row.get(0))?;
            rows.collect::<rusqlite::Result<_>>()?
        };

        let slot = index.min(ids.len());
        ids.insert(slot, task_id.to_string());

        let (status, column_id) = placement_columns(placement);
        tx.execute(
            "UPDATE tasks SET status = ?1, column_id = ?2, updated_at_ms = ?3 WHERE id = ?4",
            params![
                status,
                column_id,
                Utc::now().timestamp_millis(),
                task_id.to_string()
            ],
        )?;

        // Dense renumber of the destination; the source column keeps its
        // gap and relative order
        for (ord, id) in ids.iter().enumerate() {
            tx.execute(
                "UPDATE tasks SET ord = ?1 WHERE id = ?2",
                params![ord as i64, id],
            )?;
        }

        tx.commit()?;
        tracing::debug!(task = %task_id, column = %placement, index = slot, "reordered task");
        Ok(())
    }

    async fn move_column(
        &self,
        board_id: BoardId,
        column_id: ColumnId,
        to_index: usize,
    ) -> Result<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let mut ids: Vec<String> = {
            let mut stmt = tx.prepare(
                "SELECT id FROM columns WHERE board_id = ?1 ORDER BY position",
            )?;
            let rows = stmt.query_map(params![board_id.to_string()], |row| row.get(0))?;
            rows.collect::<rusqlite::Result<_>>()?
        };

        let target = column_id.to_string();
        let from = ids
            .iter()
            .position(|id| id == &target)
            .ok_or_else(|| TaskrailError::ColumnNotFound(target.clone()))?;
        let to = to_index.min(ids.len().saturating_sub(1));
        if from == to {
            return Ok(());
        }

        let moved = ids.remove(from);
        ids.insert(to, moved);
        for (position, id) in ids.iter().enumerate() {
            tx.execute(
                "UPDATE columns SET position = ?1 WHERE id = ?2",
                params![position as i64, id],
            )?;
        }

        tx.commit()?;
        tracing::debug!(column = %column_id, index = to, "moved column");
        Ok(())
    }
}
