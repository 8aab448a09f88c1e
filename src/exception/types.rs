//! Errors request handlers raise to get a specific response shape.

use axum::http::StatusCode as HttpStatusCode;
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

/// The client hit a rate limit.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ThrottleRequestsException {
    message: String,
}

impl ThrottleRequestsException {
    pub fn new() -> Self {
        Self::with_message("Too Many Attempts.")
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for ThrottleRequestsException {
    fn default() -> Self {
        Self::new()
    }
}

/// Field-level validation failures, in the order they were recorded.
///
/// Field names are dotted paths (`items.0.name`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationException {
    errors: Vec<(String, Vec<String>)>,
}

impl ValidationException {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.errors.iter_mut().find(|(existing, _)| *existing == field) {
            Some((_, messages)) => messages.push(message),
            None => self.errors.push((field, vec![message])),
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(existing, _)| existing == field)
            .and_then(|(_, messages)| messages.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of invalid fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl fmt::Display for ValidationException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut messages = self.errors.iter().flat_map(|(_, messages)| messages);
        let Some(first) = messages.next() else {
            return f.write_str("The given data was invalid.");
        };
        f.write_str(first)?;
        match messages.count() {
            0 => Ok(()),
            1 => f.write_str(" (and 1 more error)"),
            more => write!(f, " (and {more} more errors)"),
        }
    }
}

impl std::error::Error for ValidationException {}

impl From<validator::ValidationErrors> for ValidationException {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let mut exception = Self::new();
        for (field, field_errors) in fields {
            for error in field_errors {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!(
                        "The {} field failed the {} rule.",
                        field.replace('_', " "),
                        error.code
                    ),
                };
                exception.add(field, message);
            }
        }
        exception
    }
}

/// A lookup by identifier found no record.
#[derive(Debug, Clone, Error)]
#[error("No query results for model [{model}]{}", ids_suffix(.ids))]
pub struct ModelNotFoundException {
    model: String,
    ids: Vec<String>,
}

fn ids_suffix(ids: &[String]) -> String {
    if ids.is_empty() {
        ".".to_string()
    } else {
        format!(" {}", ids.join(", "))
    }
}

impl ModelNotFoundException {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ids: Vec::new(),
        }
    }

    /// Names the model after `T`'s simple type name.
    pub fn for_model<T: ?Sized>() -> Self {
        Self::new(super::class_basename(std::any::type_name::<T>()))
    }

    pub fn with_ids<I, V>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.ids = ids.into_iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

/// A database statement failed.
#[derive(Debug, Clone, Error)]
#[error("{message}{}", sql_suffix(.sql, .bindings))]
pub struct QueryException {
    message: String,
    sql: Option<String>,
    bindings: Vec<String>,
}

fn sql_suffix(sql: &Option<String>, bindings: &[String]) -> String {
    match sql {
        Some(sql) => format!(" (SQL: {})", interpolate(sql, bindings)),
        None => String::new(),
    }
}

// Each `?` takes the next binding; extra `?` are left as-is.
fn interpolate(sql: &str, bindings: &[String]) -> String {
    let mut bindings = bindings.iter();
    let mut out = String::with_capacity(sql.len());
    for c in sql.chars() {
        if c != '?' {
            out.push(c);
            continue;
        }
        match bindings.next() {
            Some(binding) => out.push_str(binding),
            None => out.push('?'),
        }
    }
    out
}

impl QueryException {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sql: None,
            bindings: Vec::new(),
        }
    }

    pub fn with_sql<I, V>(mut self, sql: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.sql = Some(sql.into());
        self.bindings = bindings.into_iter().map(|b| b.to_string()).collect();
        self
    }

    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    pub fn bindings(&self) -> &[String] {
        &self.bindings
    }
}

#[cfg(feature = "sea-orm-db")]
impl From<sea_orm::DbErr> for QueryException {
    fn from(err: sea_orm::DbErr) -> Self {
        QueryException::new(err.to_string())
    }
}

/// The authenticated user may not perform the action.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AuthorizationException {
    message: String,
}

impl AuthorizationException {
    pub fn new() -> Self {
        Self::with_message("This action is unauthorized.")
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for AuthorizationException {
    fn default() -> Self {
        Self::new()
    }
}

/// No authenticated user for the checked guards.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AuthenticationException {
    message: String,
    guards: Vec<String>,
}

impl AuthenticationException {
    pub fn new() -> Self {
        Self::with_message("Unauthenticated.")
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            guards: Vec::new(),
        }
    }

    pub fn with_guards<I: IntoIterator<Item = S>, S: Into<String>>(mut self, guards: I) -> Self {
        self.guards = guards.into_iter().map(Into::into).collect();
        self
    }

    pub fn guards(&self) -> &[String] {
        &self.guards
    }
}

impl Default for AuthenticationException {
    fn default() -> Self {
        Self::new()
    }
}

/// Routing-level HTTP failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum HttpExceptionKind {
    BadRequest,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    Conflict,
    Gone,
    UnsupportedMediaType,
    UnprocessableEntity,
    ServiceUnavailable,
}

impl HttpExceptionKind {
    /// The kind answering with `status`, if any.
    pub fn from_status(status: HttpStatusCode) -> Option<Self> {
        Self::iter().find(|kind| kind.status() == status)
    }

    pub const fn status(self) -> HttpStatusCode {
        match self {
            HttpExceptionKind::BadRequest => HttpStatusCode::BAD_REQUEST,
            HttpExceptionKind::NotFound => HttpStatusCode::NOT_FOUND,
            HttpExceptionKind::MethodNotAllowed => HttpStatusCode::METHOD_NOT_ALLOWED,
            HttpExceptionKind::NotAcceptable => HttpStatusCode::NOT_ACCEPTABLE,
            HttpExceptionKind::Conflict => HttpStatusCode::CONFLICT,
            HttpExceptionKind::Gone => HttpStatusCode::GONE,
            HttpExceptionKind::UnsupportedMediaType => HttpStatusCode::UNSUPPORTED_MEDIA_TYPE,
            HttpExceptionKind::UnprocessableEntity => HttpStatusCode::UNPROCESSABLE_ENTITY,
            HttpExceptionKind::ServiceUnavailable => HttpStatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Class name used for display titles.
    pub const fn class_name(self) -> &'static str {
        match self {
            HttpExceptionKind::BadRequest => "BadRequestHttpException",
            HttpExceptionKind::NotFound => "NotFoundHttpException",
            HttpExceptionKind::MethodNotAllowed => "MethodNotAllowedHttpException",
            HttpExceptionKind::NotAcceptable => "NotAcceptableHttpException",
            HttpExceptionKind::Conflict => "ConflictHttpException",
            HttpExceptionKind::Gone => "GoneHttpException",
            HttpExceptionKind::UnsupportedMediaType => "UnsupportedMediaTypeHttpException",
            HttpExceptionKind::UnprocessableEntity => "UnprocessableEntityHttpException",
            HttpExceptionKind::ServiceUnavailable => "ServiceUnavailableHttpException",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HttpException {
    kind: HttpExceptionKind,
    message: String,
}

impl HttpException {
    pub fn new(kind: HttpExceptionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(HttpExceptionKind::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(HttpExceptionKind::NotFound, message)
    }

    pub fn not_acceptable(message: impl Into<String>) -> Self {
        Self::new(HttpExceptionKind::NotAcceptable, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(HttpExceptionKind::Conflict, message)
    }

    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        Self::new(HttpExceptionKind::UnprocessableEntity, message)
    }

    pub fn kind(&self) -> HttpExceptionKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
