//! Column visibility: a render-time projection that never touches
//! filtering, sorting or pagination.

use serde::{Deserialize, Serialize};

/// Named boolean toggles over the columns of one list view.
///
/// Plain serializable state so a frontend could persist and restore it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Column {
    key: String,
    visible: bool,
}

impl ColumnSet {
    /// All columns start visible.
    pub fn new(keys: &[&str]) -> Self {
        Self {
            columns: keys
                .iter()
                .map(|k| Column {
                    key: (*k).to_string(),
                    visible: true,
                })
                .collect(),
        }
    }

    /// Flip one column; unknown keys are ignored.
    pub fn toggle(&mut self, key: &str) {
        if let Some(col) = self.columns.iter_mut().find(|c| c.key == key) {
            col.visible = !col.visible;
        }
    }

    pub fn hide(&mut self, key: &str) {
        if let Some(col) = self.columns.iter_mut().find(|c| c.key == key) {
            col.visible = false;
        }
    }

    /// Restore every column to visible.
    pub fn show_all(&mut self) {
        for col in &mut self.columns {
            col.visible = true;
        }
    }

    /// Unknown keys render; hiding is always an explicit choice.
    pub fn is_visible(&self, key: &str) -> bool {
        self.columns
            .iter()
            .find(|c| c.key == key)
            .map_or(true, |c| c.visible)
    }

    /// Keys currently visible, in declaration order.
    pub fn visible_keys(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.key.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_visible_by_default() {
        let cols = ColumnSet::new(&["title", "status", "due_date"]);
        assert_eq!(cols.visible_keys(), vec!["title", "status", "due_date"]);
    }

    #[test]
    fn test_toggle_and_reset() {
        let mut cols = ColumnSet::new(&["title", "status"]);
        cols.toggle("status");
        assert!(!cols.is_visible("status"));
        assert!(cols.is_visible("title"));

        cols.show_all();
        assert!(cols.is_visible("status"));
    }

    #[test]
    fn test_unknown_key_is_visible() {
        let cols = ColumnSet::new(&["title"]);
        assert!(cols.is_visible("nonexistent"));
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut cols = ColumnSet::new(&["title", "status"]);
        cols.hide("title");
        let json = serde_json::to_string(&cols).unwrap();
        let restored: ColumnSet = serde_json::from_str(&json).unwrap();
        assert!(!restored.is_visible("title"));
        assert!(restored.is_visible("status"));
    }
}
