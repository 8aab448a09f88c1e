use crate::di::Container;
use crate::exception::Throwable;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Axum extractor resolving a binding from the container
///
/// # Example
/// ```ignore
/// use tenantry::di::Inject;
/// use tenantry::common::{ApiResponse, Responder};
///
/// async fn list_widgets(Inject(responder): Inject<Responder>) -> ApiResponse<Vec<Widget>> {
///     responder.success(None, Some(vec![]))
/// }
/// ```
pub struct Inject<T: ?Sized>(pub Arc<T>);

/// Trait that router state must implement to provide the container
pub trait HasContainer {
    fn get_container(&self) -> &Container;
}

impl<S, T> FromRequestParts<S> for Inject<T>
where
    S: Send + Sync + HasContainer,
    T: ?Sized + Send + Sync + 'static,
{
    /// Rendered by the exception layer like any error a handler raises.
    type Rejection = Throwable;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        state.get_container().make::<T>().map(Inject).map_err(|e| {
            tracing::error!(error = %e, "Container resolution failed");
            Throwable::new(e)
        })
    }
}

impl<T: ?Sized> std::ops::Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: ?Sized> Clone for Inject<T> {
    fn clone(&self) -> Self {
        Inject(Arc::clone(&self.0))
    }
}
