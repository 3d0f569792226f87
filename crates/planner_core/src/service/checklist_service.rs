//! Checklist use-case service.
//!
//! # Responsibility
//! - Create, edit, check, reorder and delete folders, checklists and items.
//!
//! # Invariants
//! - A parent must exist and be a folder or checklist.
//! - Folders and checklists carry a non-blank title; items may start blank.
//! - Reordering happens among the unchecked children of one parent.

use crate::model::checklist::{ChecklistColor, ChecklistItem, ChecklistItemKind};
use crate::model::list_item::ListItemId;
use crate::order::compute_insertion_key;
use crate::repo::checklist_repo::ChecklistRepository;
use crate::repo::RepoError;
use crate::service::warn_on_exhausted_gap;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from checklist service operations.
#[derive(Debug)]
pub enum ChecklistServiceError {
    /// Folder/checklist title is blank after trim.
    BlankTitle(ChecklistItemKind),
    /// Target entry does not exist.
    EntryNotFound(ListItemId),
    /// Parent entry does not exist.
    ParentNotFound(ListItemId),
    /// Parent exists but cannot hold children.
    ParentNotContainer(ListItemId),
    /// Checked entries are not part of the orderable list.
    EntryChecked(ListItemId),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for ChecklistServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle(kind) => write!(f, "{} title must not be blank", kind.as_str()),
            Self::EntryNotFound(id) => write!(f, "checklist entry not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "checklist parent not found: {id}"),
            Self::ParentNotContainer(id) => {
                write!(f, "checklist parent cannot hold entries: {id}")
            }
            Self::EntryChecked(id) => write!(f, "checklist entry is checked: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ChecklistServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ChecklistServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::EntryNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ChecklistServiceResult<T> = Result<T, ChecklistServiceError>;

/// Input for creating or editing an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistDraft {
    pub kind: ChecklistItemKind,
    pub title: String,
    pub color: ChecklistColor,
}

impl ChecklistDraft {
    pub fn new(kind: ChecklistItemKind, title: impl Into<String>, color: ChecklistColor) -> Self {
        Self {
            kind,
            title: title.into(),
            color,
        }
    }
}

/// Checklist service facade.
pub struct ChecklistService<R: ChecklistRepository> {
    repo: R,
}

impl<R: ChecklistRepository> ChecklistService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists children of `parent_id` (`None` = top level), checked included.
    pub fn list_children(
        &self,
        parent_id: Option<ListItemId>,
    ) -> ChecklistServiceResult<Vec<ChecklistItem>> {
        if let Some(parent_id) = parent_id {
            self.ensure_container(parent_id)?;
        }
        self.repo
            .list_children(parent_id, true)
            .map_err(Into::into)
    }

    /// Appends an entry after the parent's last unchecked child.
    pub fn create_entry(
        &self,
        parent_id: Option<ListItemId>,
        draft: ChecklistDraft,
    ) -> ChecklistServiceResult<ChecklistItem> {
        self.create_entry_at(parent_id, usize::MAX, draft)
    }

    /// Inserts an entry at display `index` among the parent's unchecked
    /// children.
    pub fn create_entry_at(
        &self,
        parent_id: Option<ListItemId>,
        index: usize,
        draft: ChecklistDraft,
    ) -> ChecklistServiceResult<ChecklistItem> {
        if let Some(parent_id) = parent_id {
            self.ensure_container(parent_id)?;
        }
        let title = normalize_title(draft.kind, draft.title)?;

        let siblings = self.repo.list_children(parent_id, false)?;
        let sort_key = compute_insertion_key(index, &siblings);
        warn_on_exhausted_gap(&siblings, sort_key, ParentScope(parent_id));
        let entry = ChecklistItem::new(draft.kind, title, draft.color, sort_key, parent_id);
        self.repo.create_entry(&entry)?;

        info!(
            "event=checklist_entry_create module=service status=ok entry_id={} kind={} sort_key={}",
            entry.id(),
            entry.kind.as_str(),
            sort_key
        );
        Ok(entry)
    }

    /// Replaces kind, title and color of an entry.
    ///
    /// An entry that already has children keeps being a container; turning
    /// it into an item is rejected.
    pub fn update_entry(
        &self,
        id: ListItemId,
        draft: ChecklistDraft,
    ) -> ChecklistServiceResult<ChecklistItem> {
        let mut entry = self.require_entry(id)?;
        let title = normalize_title(draft.kind, draft.title)?;
        if !draft.kind.is_container() && !self.repo.list_children(Some(id), true)?.is_empty() {
            return Err(ChecklistServiceError::ParentNotContainer(id));
        }

        entry.kind = draft.kind;
        entry.item.title = title;
        entry.color = draft.color;
        self.repo.update_entry(&entry)?;
        Ok(entry)
    }

    /// Checks or unchecks an entry, keeping its sort key.
    pub fn set_entry_checked(
        &self,
        id: ListItemId,
        is_checked: bool,
    ) -> ChecklistServiceResult<ChecklistItem> {
        let mut entry = self.require_entry(id)?;
        if entry.item.is_checked != is_checked {
            entry.item.is_checked = is_checked;
            self.repo.update_entry(&entry)?;
        }
        Ok(entry)
    }

    /// Moves an unchecked entry to display `to_index` among its siblings.
    ///
    /// Returns the entry's new sort key.
    pub fn move_entry(&self, id: ListItemId, to_index: usize) -> ChecklistServiceResult<f64> {
        let entry = self.require_entry(id)?;
        if entry.item.is_checked {
            return Err(ChecklistServiceError::EntryChecked(id));
        }

        let mut siblings = self.repo.list_children(entry.parent_id, false)?;
        if siblings.iter().position(|sibling| sibling.id() == id) == Some(to_index) {
            return Ok(entry.item.sort_key);
        }
        siblings.retain(|sibling| sibling.id() != id);

        let sort_key = compute_insertion_key(to_index, &siblings);
        warn_on_exhausted_gap(&siblings, sort_key, ParentScope(entry.parent_id));
        self.repo.set_sort_key(id, sort_key)?;
        info!(
            "event=checklist_entry_move module=service status=ok entry_id={} to_index={} sort_key={}",
            id, to_index, sort_key
        );
        Ok(sort_key)
    }

    /// Deletes an entry and everything below it.
    pub fn delete_entry(&self, id: ListItemId) -> ChecklistServiceResult<()> {
        self.repo.delete_entry(id)?;
        info!(
            "event=checklist_entry_delete module=service status=ok entry_id={}",
            id
        );
        Ok(())
    }

    fn require_entry(&self, id: ListItemId) -> ChecklistServiceResult<ChecklistItem> {
        self.repo
            .get_entry(id)?
            .ok_or(ChecklistServiceError::EntryNotFound(id))
    }

    fn ensure_container(&self, parent_id: ListItemId) -> ChecklistServiceResult<()> {
        let parent = self
            .repo
            .get_entry(parent_id)?
            .ok_or(ChecklistServiceError::ParentNotFound(parent_id))?;
        if !parent.kind.is_container() {
            return Err(ChecklistServiceError::ParentNotContainer(parent_id));
        }
        Ok(())
    }
}

/// Log label of one sibling list.
struct ParentScope(Option<ListItemId>);

impl Display for ParentScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(parent_id) => write!(f, "parent:{parent_id}"),
            None => write!(f, "parent:root"),
        }
    }
}

fn normalize_title(kind: ChecklistItemKind, title: String) -> ChecklistServiceResult<String> {
    let trimmed = title.trim();
    if kind.is_container() && trimmed.is_empty() {
        return Err(ChecklistServiceError::BlankTitle(kind));
    }
    Ok(trimmed.to_string())
}
