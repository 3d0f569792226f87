use planner_core::db::open_db_in_memory;
use planner_core::{
    ChecklistColor, ChecklistDraft, ChecklistItemKind, ChecklistRepository, ChecklistService,
    ChecklistServiceError, SqliteChecklistRepository,
};
use rusqlite::Connection;

type Service<'conn> = ChecklistService<SqliteChecklistRepository<'conn>>;

fn service(conn: &Connection) -> Service<'_> {
    ChecklistService::new(SqliteChecklistRepository::try_new(conn).unwrap())
}

fn draft(kind: ChecklistItemKind, title: &str) -> ChecklistDraft {
    ChecklistDraft::new(kind, title, ChecklistColor::default())
}

fn titles(service: &Service<'_>, parent: Option<uuid::Uuid>) -> Vec<String> {
    service
        .list_children(parent)
        .unwrap()
        .into_iter()
        .map(|entry| entry.item.title)
        .collect()
}

#[test]
fn appended_entries_are_spaced_by_default_gap() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let home = service
        .create_entry(None, draft(ChecklistItemKind::Folder, "Home"))
        .unwrap();
    let work = service
        .create_entry(None, draft(ChecklistItemKind::Folder, "Work"))
        .unwrap();
    let first = service
        .create_entry_at(None, 0, draft(ChecklistItemKind::Checklist, "Inbox"))
        .unwrap();

    assert_eq!(home.item.sort_key, 8.0);
    assert_eq!(work.item.sort_key, 16.0);
    assert_eq!(first.item.sort_key, 4.0);
    assert_eq!(titles(&service, None), vec!["Inbox", "Home", "Work"]);
}

#[test]
fn titles_are_trimmed_and_containers_need_one() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .create_entry(None, draft(ChecklistItemKind::Folder, "   "))
        .unwrap_err();
    assert!(matches!(
        err,
        ChecklistServiceError::BlankTitle(ChecklistItemKind::Folder)
    ));

    let list = service
        .create_entry(None, draft(ChecklistItemKind::Checklist, "  Groceries "))
        .unwrap();
    assert_eq!(list.item.title, "Groceries");

    let blank_item = service
        .create_entry(Some(list.id()), draft(ChecklistItemKind::Item, ""))
        .unwrap();
    assert_eq!(blank_item.item.title, "");
    assert_eq!(blank_item.parent_id, Some(list.id()));
}

#[test]
fn parents_must_exist_and_hold_children() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let list = service
        .create_entry(None, draft(ChecklistItemKind::Checklist, "Packing"))
        .unwrap();
    let socks = service
        .create_entry(Some(list.id()), draft(ChecklistItemKind::Item, "Socks"))
        .unwrap();

    let err = service
        .create_entry(Some(socks.id()), draft(ChecklistItemKind::Item, "Left"))
        .unwrap_err();
    assert!(matches!(err, ChecklistServiceError::ParentNotContainer(id) if id == socks.id()));

    let missing = uuid::Uuid::new_v4();
    let err = service
        .create_entry(Some(missing), draft(ChecklistItemKind::Item, "Ghost"))
        .unwrap_err();
    assert!(matches!(err, ChecklistServiceError::ParentNotFound(id) if id == missing));
}

#[test]
fn move_entry_reorders_among_unchecked_siblings() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let list = service
        .create_entry(None, draft(ChecklistItemKind::Checklist, "Packing"))
        .unwrap();
    let parent = Some(list.id());
    let socks = service
        .create_entry(parent, draft(ChecklistItemKind::Item, "Socks"))
        .unwrap();
    let shirt = service
        .create_entry(parent, draft(ChecklistItemKind::Item, "Shirt"))
        .unwrap();
    let charger = service
        .create_entry(parent, draft(ChecklistItemKind::Item, "Charger"))
        .unwrap();

    assert_eq!(service.move_entry(charger.id(), 1).unwrap(), 12.0);
    assert_eq!(titles(&service, parent), vec!["Socks", "Charger", "Shirt"]);

    assert_eq!(service.move_entry(socks.id(), 2).unwrap(), 24.0);
    assert_eq!(titles(&service, parent), vec!["Charger", "Shirt", "Socks"]);

    service.set_entry_checked(shirt.id(), true).unwrap();
    let err = service.move_entry(shirt.id(), 0).unwrap_err();
    assert!(matches!(err, ChecklistServiceError::EntryChecked(_)));

    // Checked entries stay listed but are skipped when computing keys.
    let hat = service
        .create_entry_at(parent, 1, draft(ChecklistItemKind::Item, "Hat"))
        .unwrap();
    assert_eq!(hat.item.sort_key, 18.0);
    assert_eq!(service.list_children(parent).unwrap().len(), 4);
}

#[test]
fn update_entry_keeps_parents_as_containers() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let folder = service
        .create_entry(None, draft(ChecklistItemKind::Folder, "Trips"))
        .unwrap();
    service
        .create_entry(
            Some(folder.id()),
            draft(ChecklistItemKind::Checklist, "Packing"),
        )
        .unwrap();

    let err = service
        .update_entry(folder.id(), draft(ChecklistItemKind::Item, "Trips"))
        .unwrap_err();
    assert!(matches!(err, ChecklistServiceError::ParentNotContainer(_)));

    let renamed = service
        .update_entry(
            folder.id(),
            ChecklistDraft::new(ChecklistItemKind::Checklist, "Travel", ChecklistColor::Green),
        )
        .unwrap();
    assert_eq!(renamed.item.title, "Travel");
    assert_eq!(renamed.color, ChecklistColor::Green);
    assert_eq!(renamed.item.sort_key, folder.item.sort_key);
}

#[test]
fn deleting_a_folder_deletes_its_subtree() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let folder = service
        .create_entry(None, draft(ChecklistItemKind::Folder, "Trips"))
        .unwrap();
    let list = service
        .create_entry(
            Some(folder.id()),
            draft(ChecklistItemKind::Checklist, "Packing"),
        )
        .unwrap();
    service
        .create_entry(Some(list.id()), draft(ChecklistItemKind::Item, "Socks"))
        .unwrap();

    service.delete_entry(folder.id()).unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM checklist_items;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
    assert!(matches!(
        service.list_children(Some(list.id())),
        Err(ChecklistServiceError::ParentNotFound(_))
    ));
    assert!(matches!(
        service.delete_entry(folder.id()),
        Err(ChecklistServiceError::EntryNotFound(_))
    ));
}

#[test]
fn exhausted_gap_still_accepts_inserts_and_moves() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let repo = SqliteChecklistRepository::try_new(&conn).unwrap();

    let list = service
        .create_entry(None, draft(ChecklistItemKind::Checklist, "Chores"))
        .unwrap();
    let parent = Some(list.id());
    let dishes = service
        .create_entry(parent, draft(ChecklistItemKind::Item, "Dishes"))
        .unwrap();
    let trash = service
        .create_entry(parent, draft(ChecklistItemKind::Item, "Trash"))
        .unwrap();

    // No float lies strictly between these two keys.
    repo.set_sort_key(dishes.id(), 1.0).unwrap();
    repo.set_sort_key(trash.id(), f64::from_bits(1.0_f64.to_bits() + 1))
        .unwrap();

    let mop = service
        .create_entry_at(parent, 1, draft(ChecklistItemKind::Item, "Mop"))
        .unwrap();
    assert!(mop.item.sort_key >= 1.0);
    assert!(mop.item.sort_key <= f64::from_bits(1.0_f64.to_bits() + 1));
    assert_eq!(service.list_children(parent).unwrap().len(), 3);

    let moved_key = service.move_entry(dishes.id(), 2).unwrap();
    assert!(moved_key.is_finite());
    assert_eq!(titles(&service, parent).last().map(String::as_str), Some("Dishes"));
}
