//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable keyed-store APIs over the `contacts` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `create` assigns a fresh `id` and `created_at` for every insert.
//! - The `contacts.email` unique constraint backs up the business-layer
//!   uniqueness check; a violation surfaces as `RepoError::DuplicateEmail`.
//! - Read paths reject malformed persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::contact::{Contact, ContactId, NewContact};
use crate::repo::now_epoch_ms;
use rusqlite::{params, Connection, Row, Rows};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    nombre,
    email,
    telefono,
    ciudad,
    notas,
    created_at
FROM contacts";

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-layer error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// The store already holds this email (case-insensitive).
    DuplicateEmail,
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateEmail => write!(f, "contact email already stored"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateEmail => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Keyed-store contract for contact records.
///
/// Implementations are interchangeable at composition time. Business rules
/// stay in the service layer; only storage consistency lives here.
pub trait ContactRepository {
    /// Every stored contact, newest first.
    fn get_all(&self) -> RepoResult<Vec<Contact>>;
    fn get_by_id(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    /// Case-insensitive substring match over nombre, email and ciudad.
    fn search(&self, term: &str) -> RepoResult<Vec<Contact>>;
    /// Assigns id and creation timestamp, persists, returns the full record.
    fn create(&self, draft: &NewContact) -> RepoResult<Contact>;
    /// Returns `true` iff a record existed and was removed.
    fn delete(&self, id: ContactId) -> RepoResult<bool>;
    /// Case-insensitive email lookup; `exclude_id` is reserved for a future
    /// edit operation.
    fn email_exists(&self, email: &str, exclude_id: Option<ContactId>) -> RepoResult<bool>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn get_all(&self) -> RepoResult<Vec<Contact>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CONTACT_SELECT_SQL} ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let rows = stmt.query([])?;
        collect_contacts(rows)
    }

    fn get_by_id(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }

        Ok(None)
    }

    fn search(&self, term: &str) -> RepoResult<Vec<Contact>> {
        // LIKE matching is ASCII-case-insensitive; `%`/`_` in the term
        // act as wildcards.
        let pattern = format!("%{term}%");
        let mut stmt = self.conn.prepare(&format!(
            "{CONTACT_SELECT_SQL}
             WHERE nombre LIKE ?1 OR email LIKE ?1 OR ciudad LIKE ?1
             ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let rows = stmt.query([pattern])?;
        collect_contacts(rows)
    }

    fn create(&self, draft: &NewContact) -> RepoResult<Contact> {
        let id: ContactId = Uuid::new_v4();
        let created_at = now_epoch_ms();

        self.conn
            .execute(
                "INSERT INTO contacts (id, nombre, email, telefono, ciudad, notas, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    id.to_string(),
                    draft.nombre.as_str(),
                    draft.email.as_str(),
                    draft.telefono,
                    draft.ciudad.as_str(),
                    draft.notas.as_deref(),
                    created_at,
                ],
            )
            .map_err(map_insert_error)?;

        Ok(Contact {
            id,
            nombre: draft.nombre.clone(),
            email: draft.email.clone(),
            telefono: draft.telefono,
            ciudad: draft.ciudad.clone(),
            notas: draft.notas.clone(),
            created_at,
        })
    }

    fn delete(&self, id: ContactId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn email_exists(&self, email: &str, exclude_id: Option<ContactId>) -> RepoResult<bool> {
        let count: i64 = match exclude_id {
            Some(exclude) => self.conn.query_row(
                "SELECT COUNT(*) FROM contacts WHERE LOWER(email) = LOWER(?1) AND id != ?2;",
                params![email, exclude.to_string()],
                |row| row.get(0),
            )?,
            None => self.conn.query_row(
                "SELECT COUNT(*) FROM contacts WHERE LOWER(email) = LOWER(?1);",
                [email],
                |row| row.get(0),
            )?,
        };

        Ok(count > 0)
    }
}

fn collect_contacts(mut rows: Rows<'_>) -> RepoResult<Vec<Contact>> {
    let mut contacts = Vec::new();
    while let Some(row) = rows.next()? {
        contacts.push(parse_contact_row(row)?);
    }
    Ok(contacts)
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in contacts.id"))
    })?;

    let notas: Option<String> = row.get("notas")?;

    Ok(Contact {
        id,
        nombre: row.get("nombre")?,
        email: row.get("email")?,
        telefono: row.get("telefono")?,
        ciudad: row.get("ciudad")?,
        notas: notas.filter(|value| !value.is_empty()),
        created_at: row.get("created_at")?,
    })
}

fn map_insert_error(err: rusqlite::Error) -> RepoError {
    if let rusqlite::Error::SqliteFailure(cause, Some(message)) = &err {
        if cause.code == rusqlite::ErrorCode::ConstraintViolation
            && message.contains("contacts.email")
        {
            return RepoError::DuplicateEmail;
        }
    }
    err.into()
}
