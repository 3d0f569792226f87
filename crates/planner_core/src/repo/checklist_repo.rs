//! Checklist repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist folders, checklists and checklist items as one self-referencing
//!   table.
//!
//! # Invariants
//! - Deleting an entry deletes its whole subtree (foreign-key cascade).
//! - Child listing is deterministic: `sort_key ASC, rowid ASC`.

use super::{ensure_connection_ready, parse_flag, parse_uuid, RepoError, RepoResult};
use crate::model::checklist::{ChecklistColor, ChecklistItem, ChecklistItemKind};
use crate::model::list_item::{ListItem, ListItemId};
use crate::model::validation::ModelValidationError;
use rusqlite::{params, Connection, Row};

const ENTRY_SELECT_SQL: &str = "SELECT
    uuid,
    parent_uuid,
    kind,
    color,
    title,
    is_checked,
    sort_key
FROM checklist_items";

/// Repository interface for checklist entries.
pub trait ChecklistRepository {
    /// Inserts one entry.
    fn create_entry(&self, entry: &ChecklistItem) -> RepoResult<()>;
    /// Loads one entry by id.
    fn get_entry(&self, id: ListItemId) -> RepoResult<Option<ChecklistItem>>;
    /// Lists direct children of `parent_id` (`None` = top level).
    fn list_children(
        &self,
        parent_id: Option<ListItemId>,
        include_checked: bool,
    ) -> RepoResult<Vec<ChecklistItem>>;
    /// Replaces kind, color, title, checked flag and key.
    fn update_entry(&self, entry: &ChecklistItem) -> RepoResult<()>;
    /// Updates one entry's sort key.
    fn set_sort_key(&self, id: ListItemId, sort_key: f64) -> RepoResult<()>;
    /// Deletes one entry and its subtree.
    fn delete_entry(&self, id: ListItemId) -> RepoResult<()>;
}

/// SQLite-backed checklist repository.
pub struct SqliteChecklistRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteChecklistRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "checklist_items",
            &[
                "uuid",
                "parent_uuid",
                "kind",
                "color",
                "title",
                "is_checked",
                "sort_key",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl ChecklistRepository for SqliteChecklistRepository<'_> {
    fn create_entry(&self, entry: &ChecklistItem) -> RepoResult<()> {
        entry.validate()?;
        self.conn.execute(
            "INSERT INTO checklist_items (
                uuid,
                parent_uuid,
                kind,
                color,
                title,
                is_checked,
                sort_key
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                entry.item.id.to_string(),
                entry.parent_id.map(|value| value.to_string()),
                entry.kind.as_str(),
                entry.color.as_str(),
                entry.item.title,
                entry.item.is_checked as i64,
                entry.item.sort_key,
            ],
        )?;
        Ok(())
    }

    fn get_entry(&self, id: ListItemId) -> RepoResult<Option<ChecklistItem>> {
        let sql = format!("{ENTRY_SELECT_SQL} WHERE uuid = ?1;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }
        Ok(None)
    }

    fn list_children(
        &self,
        parent_id: Option<ListItemId>,
        include_checked: bool,
    ) -> RepoResult<Vec<ChecklistItem>> {
        // `IS` matches NULL for top-level entries as well as concrete parents.
        let sql = format!(
            "{ENTRY_SELECT_SQL}
             WHERE parent_uuid IS ?1
               AND (?2 = 1 OR is_checked = 0)
             ORDER BY sort_key ASC, rowid ASC;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![
            parent_id.map(|value| value.to_string()),
            include_checked as i64,
        ])?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }

    fn update_entry(&self, entry: &ChecklistItem) -> RepoResult<()> {
        entry.validate()?;
        let changed = self.conn.execute(
            "UPDATE checklist_items
             SET kind = ?2,
                 color = ?3,
                 title = ?4,
                 is_checked = ?5,
                 sort_key = ?6,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                entry.item.id.to_string(),
                entry.kind.as_str(),
                entry.color.as_str(),
                entry.item.title,
                entry.item.is_checked as i64,
                entry.item.sort_key,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(entry.item.id));
        }
        Ok(())
    }

    fn set_sort_key(&self, id: ListItemId, sort_key: f64) -> RepoResult<()> {
        if !sort_key.is_finite() {
            return Err(ModelValidationError::NonFiniteSortKey(sort_key).into());
        }
        let changed = self.conn.execute(
            "UPDATE checklist_items
             SET sort_key = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), sort_key],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_entry(&self, id: ListItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM checklist_items WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<ChecklistItem> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "checklist_items.uuid")?;
    let parent_id = row
        .get::<_, Option<String>>("parent_uuid")?
        .map(|value| parse_uuid(&value, "checklist_items.parent_uuid"))
        .transpose()?;

    let kind_text: String = row.get("kind")?;
    let kind = ChecklistItemKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid checklist kind `{kind_text}` in checklist_items.kind"
        ))
    })?;
    let color_text: String = row.get("color")?;
    let color = ChecklistColor::parse(&color_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid checklist color `{color_text}` in checklist_items.color"
        ))
    })?;

    Ok(ChecklistItem {
        item: ListItem {
            id,
            title: row.get("title")?,
            is_checked: parse_flag(row.get("is_checked")?, "checklist_items.is_checked")?,
            sort_key: row.get("sort_key")?,
        },
        kind,
        color,
        parent_id,
    })
}
