use agenda_core::db::open_db_in_memory;
use agenda_core::{ContactRepository, NewContact, RepoError, SqliteContactRepository};
use uuid::Uuid;

fn draft(nombre: &str, email: &str, ciudad: &str) -> NewContact {
    NewContact {
        nombre: nombre.to_string(),
        email: email.to_string(),
        telefono: 3001234567.0,
        ciudad: ciudad.to_string(),
        notas: None,
    }
}

#[test]
fn create_assigns_id_and_timestamp_and_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);

    let created = repo
        .create(&draft("Juan Pérez", "juan.perez@email.com", "Bogotá"))
        .unwrap();
    assert!(!created.id.is_nil());
    assert!(created.created_at > 0);

    let loaded = repo.get_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn notes_roundtrip_through_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);

    let mut with_notes = draft("Juan Pérez", "juan.perez@email.com", "Bogotá");
    with_notes.notas = Some("Cliente preferencial".to_string());

    let created = repo.create(&with_notes).unwrap();
    let loaded = repo.get_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded.notas.as_deref(), Some("Cliente preferencial"));
}

#[test]
fn get_all_returns_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);

    let first = repo
        .create(&draft("Juan Pérez", "juan.perez@email.com", "Bogotá"))
        .unwrap();
    let second = repo
        .create(&draft("María García", "maria.garcia@email.com", "Medellín"))
        .unwrap();
    let third = repo
        .create(&draft("Carlos Ruiz", "carlos.ruiz@email.com", "Cali"))
        .unwrap();

    let ids: Vec<_> = repo.get_all().unwrap().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, [third.id, second.id, first.id]);
}

#[test]
fn get_by_id_returns_none_for_unknown_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);

    assert!(repo.get_by_id(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn delete_returns_true_once_then_false() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);

    let created = repo
        .create(&draft("Juan Pérez", "juan.perez@email.com", "Bogotá"))
        .unwrap();

    assert!(repo.delete(created.id).unwrap());
    assert!(!repo.delete(created.id).unwrap());
    assert!(repo.get_by_id(created.id).unwrap().is_none());
}

#[test]
fn email_exists_is_case_insensitive_and_respects_exclusion() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);

    let created = repo
        .create(&draft("Juan Pérez", "juan.perez@email.com", "Bogotá"))
        .unwrap();

    assert!(repo.email_exists("JUAN.PEREZ@EMAIL.COM", None).unwrap());
    assert!(!repo
        .email_exists("JUAN.PEREZ@EMAIL.COM", Some(created.id))
        .unwrap());
    assert!(!repo.email_exists("otro@email.com", None).unwrap());
}

#[test]
fn duplicate_email_insert_is_rejected_by_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);

    repo.create(&draft("Juan Pérez", "juan.perez@email.com", "Bogotá"))
        .unwrap();

    let err = repo
        .create(&draft("Otro Juan", "JUAN.PEREZ@EMAIL.COM", "Cali"))
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateEmail));

    assert_eq!(repo.get_all().unwrap().len(), 1);
}

#[test]
fn search_matches_name_email_and_city_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);

    let juan = repo
        .create(&draft("Juan Pérez", "juan.perez@email.com", "Bogotá"))
        .unwrap();
    let maria = repo
        .create(&draft("María García", "maria.garcia@email.com", "Medellín"))
        .unwrap();

    let by_city: Vec<_> = repo.search("bog").unwrap().into_iter().map(|c| c.id).collect();
    assert_eq!(by_city, [juan.id]);

    let by_name: Vec<_> = repo.search("GARC").unwrap().into_iter().map(|c| c.id).collect();
    assert_eq!(by_name, [maria.id]);

    let by_email: Vec<_> = repo
        .search("juan.perez")
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(by_email, [juan.id]);

    assert!(repo.search("bucaramanga").unwrap().is_empty());
}

#[test]
fn search_returns_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);

    let juan = repo
        .create(&draft("Juan Pérez", "juan.perez@email.com", "Bogotá"))
        .unwrap();
    let maria = repo
        .create(&draft("María García", "maria.garcia@email.com", "Medellín"))
        .unwrap();

    let ids: Vec<_> = repo
        .search("email.com")
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, [maria.id, juan.id]);
}
