//! Composition-root smoke binary.
//!
//! # Responsibility
//! - Construct one concrete store and hand it to the service layer.
//! - Seed demo contacts into an empty store and exercise list/search.
//!
//! The store choice happens here and nowhere else: `--db <path>` selects
//! the SQLite repository, anything else runs against the in-memory one.

use agenda_core::db::open_db;
use agenda_core::{
    ContactForm, ContactRepository, ContactService, MemoryContactRepository,
    SqliteContactRepository,
};

fn main() {
    println!("agenda_core version={}", agenda_core::core_version());

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None => run(ContactService::new(MemoryContactRepository::new())),
        Some("--db") => {
            let Some(path) = args.next() else {
                eprintln!("usage: agenda_cli [--db <path>]");
                std::process::exit(2);
            };
            match open_db(&path) {
                Ok(conn) => run(ContactService::new(SqliteContactRepository::new(&conn))),
                Err(err) => {
                    eprintln!("failed to open database `{path}`: {err}");
                    std::process::exit(1);
                }
            }
        }
        Some(other) => {
            eprintln!("unknown argument `{other}`; usage: agenda_cli [--db <path>]");
            std::process::exit(2);
        }
    }
}

fn run<R: ContactRepository>(service: ContactService<R>) {
    seed_demo_contacts(&service);

    let listing = service.get_all();
    let contacts = listing.data.unwrap_or_default();
    println!("contacts stored: {}", contacts.len());
    for contact in &contacts {
        println!("  {} <{}> ({})", contact.nombre, contact.email, contact.ciudad);
    }

    let hits = service.search("bogo").data.unwrap_or_default();
    println!("search `bogo` hits: {}", hits.len());
}

/// Seeds two demo contacts, only when the store is empty.
fn seed_demo_contacts<R: ContactRepository>(service: &ContactService<R>) {
    let existing = service.get_all();
    if existing
        .data
        .as_ref()
        .is_some_and(|contacts| !contacts.is_empty())
    {
        return;
    }

    let demos = [
        demo_form(
            "Juan Pérez",
            "juan.perez@email.com",
            "3001234567",
            "Bogotá",
            Some("Cliente preferencial"),
        ),
        demo_form(
            "María García",
            "maria.garcia@email.com",
            "3109876543",
            "Medellín",
            None,
        ),
    ];

    for form in &demos {
        let response = service.create(form);
        if !response.success {
            eprintln!("failed to seed demo contact");
        }
    }
}

fn demo_form(
    nombre: &str,
    email: &str,
    telefono: &str,
    ciudad: &str,
    notas: Option<&str>,
) -> ContactForm {
    ContactForm {
        nombre: nombre.to_string(),
        email: email.to_string(),
        telefono: telefono.to_string(),
        ciudad: ciudad.to_string(),
        notas: notas.map(str::to_string),
    }
}
