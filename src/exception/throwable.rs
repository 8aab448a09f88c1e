use crate::exception::HttpException;
use axum::{
    http::StatusCode as HttpStatusCode,
    response::{IntoResponse, Response},
};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Any error raised while handling a request.
///
/// Handlers return `Result<T, Throwable>` and use `?` on any
/// `std::error::Error`. The concrete type name is kept so the error can be
/// titled later.
pub struct Throwable {
    error: Box<dyn Error + Send + Sync + 'static>,
    class_name: &'static str,
}

impl Throwable {
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            error: Box::new(error),
            class_name: class_basename(std::any::type_name::<E>()),
        }
    }

    /// Simple type name of the wrapped error.
    ///
    /// `HttpException` reports its kind (`NotFoundHttpException`, ...).
    pub fn class_name(&self) -> &'static str {
        match self.downcast_ref::<HttpException>() {
            Some(http) => http.kind().class_name(),
            None => self.class_name,
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn is<E: Error + 'static>(&self) -> bool {
        self.error.is::<E>()
    }

    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.error.downcast_ref::<E>()
    }

    pub fn as_error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.error.as_ref()
    }

    pub fn into_inner(self) -> Box<dyn Error + Send + Sync + 'static> {
        self.error
    }
}

impl<E> From<E> for Throwable
where
    E: Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl fmt::Debug for Throwable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throwable")
            .field("class_name", &self.class_name())
            .field("error", &self.error)
            .finish()
    }
}

impl fmt::Display for Throwable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

/// Response extension carrying a raised error to the exception middleware.
#[derive(Debug, Clone)]
pub struct CaughtException(pub Arc<Throwable>);

/// Without [`crate::exception::ExceptionLayer`] in the stack the client sees a
/// bare 500; the layer replaces it with the rendered error.
impl IntoResponse for Throwable {
    fn into_response(self) -> Response {
        let mut response = HttpStatusCode::INTERNAL_SERVER_ERROR.into_response();
        response
            .extensions_mut()
            .insert(CaughtException(Arc::new(self)));
        response
    }
}

/// Last path segment of a type name, without generic arguments.
///
/// Both `::` and `\` separate segments.
pub fn class_basename(type_name: &str) -> &str {
    let path = type_name.split('<').next().unwrap_or(type_name);
    path.rsplit([':', '\\']).next().unwrap_or(path)
}
