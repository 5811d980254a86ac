//! Contact record, form input and field validation.
//!
//! # Responsibility
//! - Define the persisted contact shape and its wire serialization.
//! - Validate raw form input field by field, without short-circuiting.
//! - Normalize accepted input into a storable draft.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store, never by callers.
//! - A `NewContact` only exists for input that passed every field rule.
//! - `email` in a `NewContact` is trimmed and lower-cased.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a stored contact.
pub type ContactId = Uuid;

// Same shape check the form UI applies: local@domain.tld, no whitespace.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const MIN_NOMBRE_CHARS: usize = 2;
const MIN_TELEFONO_CHARS: usize = 7;

/// Persisted contact record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Store-assigned stable ID.
    pub id: ContactId,
    pub nombre: String,
    /// Trimmed and lower-cased; unique across the store (case-insensitive).
    pub email: String,
    /// Numeric phone value, as permissive as the input parse.
    pub telefono: f64,
    pub ciudad: String,
    /// Absent rather than empty when the form left it blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    /// Epoch milliseconds, assigned by the store at creation.
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

/// Raw form input as submitted by UI/HTTP collaborators.
///
/// Every field arrives as a string; `telefono` is only parsed during
/// validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub nombre: String,
    pub email: String,
    pub telefono: String,
    pub ciudad: String,
    pub notas: Option<String>,
}

/// Validated, normalized draft ready for store insertion.
///
/// Carries everything a [`Contact`] has except the store-assigned fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub nombre: String,
    pub email: String,
    pub telefono: f64,
    pub ciudad: String,
    pub notas: Option<String>,
}

/// Single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ContactForm {
    /// Runs every field rule without short-circuiting.
    ///
    /// Returns one entry per failing field in form order; empty when the
    /// input is acceptable. `notas` is optional and never checked.
    pub fn validate(&self) -> Vec<FieldError> {
        self.normalized().err().unwrap_or_default()
    }

    /// Validates and normalizes this form into a storable draft.
    ///
    /// Normalization: strings trimmed, email lower-cased, phone parsed to
    /// its numeric value, blank notes dropped entirely.
    pub fn normalized(&self) -> Result<NewContact, Vec<FieldError>> {
        let mut errors = Vec::new();

        let nombre = self.nombre.trim();
        if nombre.is_empty() {
            errors.push(FieldError::new("nombre", "El nombre es obligatorio"));
        } else if nombre.chars().count() < MIN_NOMBRE_CHARS {
            errors.push(FieldError::new(
                "nombre",
                "El nombre debe tener al menos 2 caracteres",
            ));
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::new("email", "El email es obligatorio"));
        } else if !EMAIL_RE.is_match(&self.email) {
            errors.push(FieldError::new("email", "El formato del email no es válido"));
        }

        let telefono = if self.telefono.trim().is_empty() {
            errors.push(FieldError::new("telefono", "El teléfono es obligatorio"));
            None
        } else {
            let parsed = parse_telefono(&self.telefono);
            if parsed.is_none() {
                errors.push(FieldError::new(
                    "telefono",
                    "El teléfono debe ser un número válido (mínimo 7 dígitos)",
                ));
            }
            parsed
        };

        let ciudad = self.ciudad.trim();
        if ciudad.is_empty() {
            errors.push(FieldError::new("ciudad", "La ciudad es obligatoria"));
        }

        match (errors.is_empty(), telefono) {
            (true, Some(telefono)) => Ok(NewContact {
                nombre: nombre.to_string(),
                email: email.to_lowercase(),
                telefono,
                ciudad: ciudad.to_string(),
                notas: normalize_notas(self.notas.as_deref()),
            }),
            _ => Err(errors),
        }
    }
}

/// Permissive numeric phone check: the raw string needs at least 7
/// characters and its trimmed form must parse to a positive number.
/// Floats and scientific notation pass on purpose.
fn parse_telefono(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value > 0.0 && raw.chars().count() >= MIN_TELEFONO_CHARS).then_some(value)
}

fn normalize_notas(notas: Option<&str>) -> Option<String> {
    let trimmed = notas?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
