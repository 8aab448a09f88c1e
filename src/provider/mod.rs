//! Service providers
//!
//! Providers register bindings into the container and run boot-time checks
//! once every provider has registered. [`Application::boot`] drives both
//! phases in order.

mod app;
mod application;

pub use app::AppServiceProvider;
pub use application::Application;

use crate::di::Container;
use crate::error::Result;
use async_trait::async_trait;

/// Registers bindings into the container.
///
/// # Example
///
/// ```rust,ignore
/// use tenantry::provider::ServiceProvider;
/// use tenantry::di::Container;
/// use async_trait::async_trait;
///
/// struct BillingProvider;
///
/// #[async_trait]
/// impl ServiceProvider for BillingProvider {
///     fn register(&self, container: &mut Container) -> tenantry::Result<()> {
///         container.instance(Arc::new(InvoiceMailer::default()));
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ServiceProvider: Send + Sync {
    /// Called for every provider before any provider boots.
    fn register(&self, container: &mut Container) -> Result<()>;

    /// Called after all providers have registered.
    async fn boot(&self, _container: &Container) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
