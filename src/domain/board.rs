use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Unique identifier for a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardId(Uuid);

impl BoardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BoardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BoardId {
    type Err = crate::error::TaskrailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| crate::error::TaskrailError::InvalidBoardId(s.to_string()))
    }
}

/// Unique identifier for a column on a dynamic board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnId(Uuid);

impl ColumnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ColumnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ColumnId {
    type Err = crate::error::TaskrailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| crate::error::TaskrailError::InvalidPlacementKey(s.to_string()))
    }
}

/// Who can see a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Members(Vec<String>),
}

/// A column on a dynamic board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub name: String,
    pub color: Option<String>,
    pub field_template: Option<String>,
    /// Dense 0..n-1 index among sibling columns
    pub position: usize,
}

impl Column {
    pub fn new(board_id: BoardId, name: String, position: usize) -> Self {
        Self {
            id: ColumnId::new(),
            board_id,
            name,
            color: None,
            field_template: None,
            position,
        }
    }

    pub fn with_color(mut self, color: String) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_field_template(mut self, template: String) -> Self {
        self.field_template = Some(template);
        self
    }
}

/// A kanban board and its ordered columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub visibility: Visibility,
    pub columns: Vec<Column>,
}

impl Board {
    pub fn new(name: String, visibility: Visibility) -> Self {
        Self {
            id: BoardId::new(),
            name,
            visibility,
            columns: Vec::new(),
        }
    }

    /// Appends a column at the end of the board
    pub fn add_column(&mut self, name: String) -> ColumnId {
        let column = Column::new(self.id, name, self.columns.len());
        let id = column.id;
        self.columns.push(column);
        id
    }

    /// Gets a column by id
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|col| col.id == id)
    }

    /// Columns in display order
    pub fn columns_ordered(&self) -> Vec<&Column> {
        let mut ordered: Vec<&Column> = self.columns.iter().collect();
        ordered.sort_by_key(|col| col.position);
        ordered
    }

    /// Moves a column to a target index, shifting every sibling between the
    /// old and new position by one. Positions stay a dense 0..n-1 sequence;
    /// the whole sibling set is renumbered in one mutation.
    ///
    /// A target past the end is clamped to the last slot. Moving a column
    /// onto its own index is a no-op.
    pub fn move_column(&mut self, id: ColumnId, to_index: usize) -> crate::error::Result<()> {
        // The vec may arrive in any order (it is deserialized as-is), so
        // sort by position before locating the column's current index.
        self.columns.sort_by_key(|col| col.position);
        let from = self
            .columns
            .iter()
            .position(|col| col.id == id)
            .ok_or_else(|| crate::error::TaskrailError::ColumnNotFound(id.to_string()))?;

        let to = to_index.min(self.columns.len().saturating_sub(1));
        if from == to {
            return Ok(());
        }

        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        for (index, col) in self.columns.iter_mut().enumerate() {
            col.position = index;
        }
        Ok(())
    }
}
