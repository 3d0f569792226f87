//! Hierarchical checklist model.
//!
//! Folders hold checklists and folders; checklists hold items. Entries are
//! never timed, so the chronological reconciler leaves them alone.

use super::list_item::{ListItem, ListItemId};
use super::validation::ModelValidationError;
use crate::order::OrderableItem;
use serde::{Deserialize, Serialize};

/// Kind of checklist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistItemKind {
    Folder,
    Checklist,
    Item,
}

impl ChecklistItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Checklist => "checklist",
            Self::Item => "item",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "folder" => Some(Self::Folder),
            "checklist" => Some(Self::Checklist),
            "item" => Some(Self::Item),
            _ => None,
        }
    }

    /// Whether entries of this kind may have children.
    pub fn is_container(self) -> bool {
        !matches!(self, Self::Item)
    }
}

/// Accent color of a checklist entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistColor {
    #[default]
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Indigo,
    Purple,
    Brown,
    /// Follows the platform label color.
    Label,
}

impl ChecklistColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Cyan => "cyan",
            Self::Indigo => "indigo",
            Self::Purple => "purple",
            Self::Brown => "brown",
            Self::Label => "label",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "red" => Some(Self::Red),
            "orange" => Some(Self::Orange),
            "yellow" => Some(Self::Yellow),
            "green" => Some(Self::Green),
            "cyan" => Some(Self::Cyan),
            "indigo" => Some(Self::Indigo),
            "purple" => Some(Self::Purple),
            "brown" => Some(Self::Brown),
            "label" => Some(Self::Label),
            _ => None,
        }
    }
}

/// One folder, checklist or checklist item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    #[serde(flatten)]
    pub item: ListItem,
    pub kind: ChecklistItemKind,
    pub color: ChecklistColor,
    /// `None` means top level.
    pub parent_id: Option<ListItemId>,
}

impl ChecklistItem {
    /// Creates an entry with a generated id.
    pub fn new(
        kind: ChecklistItemKind,
        title: impl Into<String>,
        color: ChecklistColor,
        sort_key: f64,
        parent_id: Option<ListItemId>,
    ) -> Self {
        let mut item = ListItem::new(sort_key);
        item.title = title.into();
        Self {
            item,
            kind,
            color,
            parent_id,
        }
    }

    pub fn id(&self) -> ListItemId {
        self.item.id
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        self.item.validate()?;
        if self.parent_id == Some(self.item.id) {
            return Err(ModelValidationError::SelfParent);
        }
        Ok(())
    }
}

impl OrderableItem for ChecklistItem {
    type Id = ListItemId;

    fn item_id(&self) -> &Self::Id {
        &self.item.id
    }

    fn sort_key(&self) -> f64 {
        self.item.sort_key
    }

    fn occurs_at(&self) -> Option<&str> {
        None
    }
}
