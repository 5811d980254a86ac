//! Contact business rules and response shaping.
//!
//! # Responsibility
//! - Enforce field validation and email uniqueness ahead of persistence.
//! - Shape every operation outcome into the uniform response envelope.
//!
//! # Invariants
//! - The store is never asked to insert input that failed validation.
//! - Backend failures map to a generic internal error; the detail goes to
//!   the log, never to the caller.
//! - Log lines carry ids and counts only, no contact field values.

use crate::model::contact::{Contact, ContactForm, ContactId, FieldError};
use crate::repo::contact_repo::{ContactRepository, RepoError};
use log::{error, info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MSG_DUPLICATE_EMAIL: &str = "Este email ya está registrado";
const MSG_NOT_FOUND: &str = "Contacto no encontrado";
const MSG_DELETE_FAILED: &str = "No se pudo eliminar el contacto";
const MSG_INTERNAL: &str = "Error al procesar la solicitud";

/// Business-layer failure taxonomy.
#[derive(Debug)]
pub enum ServiceError {
    /// One or more field rules failed; carries the full error list.
    Validation(Vec<FieldError>),
    /// Format checks passed but the email is already registered.
    DuplicateEmail,
    /// Delete target does not exist.
    NotFound(ContactId),
    /// Delete target existed but no record was removed.
    DeleteFailed(ContactId),
    /// Unexpected storage failure; detail stays behind this boundary.
    Internal(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => {
                write!(f, "validation failed on {} field(s)", errors.len())
            }
            Self::DuplicateEmail => write!(f, "email already registered"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::DeleteFailed(id) => write!(f, "contact delete had no effect: {id}"),
            Self::Internal(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Internal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            // Backstop for the storage-level unique constraint; keeps
            // check+insert logically atomic even under concurrent creates.
            RepoError::DuplicateEmail => Self::DuplicateEmail,
            other => Self::Internal(other),
        }
    }
}

/// Machine-readable failure tag carried by the envelope.
///
/// Lets the transport layer map failures to status codes without parsing
/// human-readable messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    DuplicateEmail,
    NotFound,
    DeleteFailed,
    Internal,
}

/// Uniform success/failure envelope returned by every service operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            code: None,
            error: None,
            errors: None,
        }
    }

    /// Success without a payload, used by delete.
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            code: None,
            error: None,
            errors: None,
        }
    }

    fn failure(code: ErrorCode, error: Option<String>, errors: Option<Vec<FieldError>>) -> Self {
        Self {
            success: false,
            data: None,
            code: Some(code),
            error,
            errors,
        }
    }
}

impl<T> From<Result<T, ServiceError>> for ApiResponse<T> {
    fn from(result: Result<T, ServiceError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(ServiceError::Validation(errors)) => {
                Self::failure(ErrorCode::Validation, None, Some(errors))
            }
            Err(ServiceError::DuplicateEmail) => Self::failure(
                ErrorCode::DuplicateEmail,
                None,
                Some(vec![FieldError::new("email", MSG_DUPLICATE_EMAIL)]),
            ),
            Err(ServiceError::NotFound(_)) => {
                Self::failure(ErrorCode::NotFound, Some(MSG_NOT_FOUND.to_string()), None)
            }
            Err(ServiceError::DeleteFailed(_)) => Self::failure(
                ErrorCode::DeleteFailed,
                Some(MSG_DELETE_FAILED.to_string()),
                None,
            ),
            Err(ServiceError::Internal(_)) => {
                Self::failure(ErrorCode::Internal, Some(MSG_INTERNAL.to_string()), None)
            }
        }
    }
}

/// Contact use-case service over an interchangeable store.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Runs every field rule; empty when the form is acceptable. Pure read.
    pub fn validate(&self, form: &ContactForm) -> Vec<FieldError> {
        form.validate()
    }

    /// Validates, enforces email uniqueness, then persists a new contact.
    pub fn create(&self, form: &ContactForm) -> ApiResponse<Contact> {
        self.finish("contact_create", self.try_create(form))
    }

    /// Returns every stored contact, newest first.
    pub fn get_all(&self) -> ApiResponse<Vec<Contact>> {
        self.finish("contact_list", self.repo.get_all().map_err(ServiceError::from))
    }

    /// Blank terms (after trim) list everything; otherwise case-insensitive
    /// substring match over nombre, email and ciudad, newest first.
    pub fn search(&self, term: &str) -> ApiResponse<Vec<Contact>> {
        let result = if term.trim().is_empty() {
            self.repo.get_all()
        } else {
            self.repo.search(term)
        };
        self.finish("contact_search", result.map_err(ServiceError::from))
    }

    /// Deletes one contact, distinguishing a missing id from a removal
    /// that did not take effect.
    pub fn delete(&self, id: ContactId) -> ApiResponse<()> {
        match self.try_delete(id) {
            Ok(()) => ApiResponse::ok_empty(),
            Err(err) => {
                log_failure("contact_delete", &err);
                Err(err).into()
            }
        }
    }

    fn try_create(&self, form: &ContactForm) -> Result<Contact, ServiceError> {
        let draft = form.normalized().map_err(ServiceError::Validation)?;

        if self.repo.email_exists(&draft.email, None)? {
            return Err(ServiceError::DuplicateEmail);
        }

        let contact = self.repo.create(&draft)?;
        info!(
            "event=contact_create module=service status=ok id={}",
            contact.id
        );
        Ok(contact)
    }

    fn try_delete(&self, id: ContactId) -> Result<(), ServiceError> {
        if self.repo.get_by_id(id)?.is_none() {
            return Err(ServiceError::NotFound(id));
        }

        if !self.repo.delete(id)? {
            return Err(ServiceError::DeleteFailed(id));
        }

        info!("event=contact_delete module=service status=ok id={id}");
        Ok(())
    }

    fn finish<T>(&self, event: &str, result: Result<T, ServiceError>) -> ApiResponse<T> {
        if let Err(err) = &result {
            log_failure(event, err);
        }
        result.into()
    }
}

fn log_failure(event: &str, err: &ServiceError) {
    match err {
        ServiceError::Validation(errors) => warn!(
            "event={event} module=service status=rejected reason=validation error_count={}",
            errors.len()
        ),
        ServiceError::DuplicateEmail => {
            warn!("event={event} module=service status=rejected reason=duplicate_email");
        }
        ServiceError::NotFound(id) => {
            warn!("event={event} module=service status=rejected reason=not_found id={id}");
        }
        ServiceError::DeleteFailed(id) => {
            warn!("event={event} module=service status=error reason=delete_failed id={id}");
        }
        ServiceError::Internal(err) => {
            error!("event={event} module=service status=error error_code=internal error={err}");
        }
    }
}
