//! # Tenantry
//!
//! Exception rendering and tenancy for multi-tenant JSON APIs built on axum.
//!
//! Handlers return `Result<T, Throwable>` and raise whatever error fits. The
//! [`ExceptionLayer`] classifies it and renders an
//! `application/problem+json` envelope with a matching status and a localized
//! title.
//!
//! ## Features
//!
//! - **Problem responses**: rate limits, validation, missing models, query
//!   failures, auth and HTTP errors each map to a fixed status and title
//! - **Localized messages**: JSON message catalogs with `:placeholder` lines
//! - **Service providers**: a type-keyed container with shared and factory
//!   bindings, booted through [`provider::ServiceProvider`]s
//! - **Tenancy**: tenants with database and domain concerns, identified per
//!   request from the `Host` header
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tenantry::prelude::*;
//!
//! async fn show_widget(Path(id): Path<u64>) -> Result<Json<u64>, Throwable> {
//!     Err(ModelNotFoundException::new("Widget").with_ids([id.to_string()]).into())
//! }
//!
//! #[tokio::main]
//! async fn main() -> tenantry::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let app = Application::boot(config, vec![Box::new(AppServiceProvider)]).await?;
//!
//!     let router: Router = Router::new()
//!         .route("/widgets/{id}", get(show_widget))
//!         .layer(app.exception_layer()?)
//!         .with_state(app);
//!
//!     // Serve the router...
//!     # let _ = router;
//!     Ok(())
//! }
//! ```

pub mod common;
pub mod config;
pub mod di;
pub mod error;
pub mod exception;
pub mod lang;
pub mod log;
pub mod provider;
pub mod tenancy;

// Re-export core types
pub use common::{ApiResponse, ProblemDocument, Responder};
pub use di::{Container, HasContainer, Inject};
pub use error::{Result, TenantryError};
pub use exception::{ExceptionFilter, ExceptionLayer, Handler, Throwable};
pub use provider::{AppServiceProvider, Application, ServiceProvider};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use tenantry::prelude::*;
/// ```
pub mod prelude {
    pub use crate::common::{ApiResponse, ProblemDocument, Responder};
    pub use crate::config::{AppConfig, ConfigService, Environment};
    pub use crate::di::{Container, HasContainer, Inject};
    pub use crate::error::{Result, TenantryError};
    pub use crate::exception::{
        AuthenticationException, AuthorizationException, ExceptionFilter, ExceptionLayer, Handler,
        HttpException, ModelNotFoundException, QueryException, ThrottleRequestsException, Throwable,
        ValidationException,
    };
    pub use crate::lang::{MessageCatalog, MessageKey, Translator};
    pub use crate::log::{ExceptionLogger, TracingLogger};
    pub use crate::provider::{AppServiceProvider, Application, ServiceProvider};
    pub use crate::tenancy::{
        CurrentTenant, HasDomains, Tenant, TenantRegistry, TenantWithDatabase,
        identify_tenant_by_domain,
    };
    pub use async_trait::async_trait;
    pub use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{delete, get, post, put},
    };
    pub use std::sync::Arc;
}
