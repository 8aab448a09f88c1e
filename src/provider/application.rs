use crate::config::AppConfig;
use crate::di::{Container, HasContainer};
use crate::error::Result;
use crate::exception::{ExceptionFilter, ExceptionLayer};
use crate::provider::ServiceProvider;
use std::sync::Arc;

/// A booted application: configuration plus every provider's bindings.
///
/// Clones share the same container, so it can be used directly as axum router
/// state for [`crate::di::Inject`].
///
/// # Example
///
/// ```rust,ignore
/// use tenantry::prelude::*;
///
/// let app = Application::boot(AppConfig::from_env()?, vec![Box::new(AppServiceProvider)]).await?;
/// let router = Router::new()
///     .route("/widgets/{id}", get(show_widget))
///     .layer(app.exception_layer()?)
///     .with_state(app);
/// ```
#[derive(Clone)]
pub struct Application {
    container: Arc<Container>,
}

impl Application {
    /// Register every provider, then boot them in the same order.
    ///
    /// `config` is bound before any provider runs.
    pub async fn boot(config: AppConfig, providers: Vec<Box<dyn ServiceProvider>>) -> Result<Self> {
        tracing::info!(app = %config.name, providers = providers.len(), "Booting application");

        let mut container = Container::new();
        container.instance(Arc::new(config));

        for provider in &providers {
            tracing::debug!(provider = provider.name(), "Registering provider");
            provider.register(&mut container)?;
        }

        for provider in &providers {
            tracing::debug!(provider = provider.name(), "Booting provider");
            provider.boot(&container).await?;
        }

        tracing::info!(bindings = container.len(), "Application booted");
        Ok(Self {
            container: Arc::new(container),
        })
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    pub fn config(&self) -> Result<Arc<AppConfig>> {
        self.container.make::<AppConfig>()
    }

    /// Middleware rendering raised errors through the bound exception filter.
    pub fn exception_layer(&self) -> Result<ExceptionLayer> {
        Ok(ExceptionLayer::new(self.container.make::<dyn ExceptionFilter>()?))
    }
}

impl HasContainer for Application {
    fn get_container(&self) -> &Container {
        &self.container
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Responder;
    use crate::config::Environment;
    use crate::error::TenantryError;
    use crate::provider::AppServiceProvider;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recording {
        label: &'static str,
        events: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ServiceProvider for Recording {
        fn register(&self, _container: &mut Container) -> Result<()> {
            self.events.lock().unwrap().push(format!("register {}", self.label));
            Ok(())
        }

        async fn boot(&self, _container: &Container) -> Result<()> {
            self.events.lock().unwrap().push(format!("boot {}", self.label));
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl ServiceProvider for Failing {
        fn register(&self, _container: &mut Container) -> Result<()> {
            Err(TenantryError::InvalidConfig {
                key: "APP_KEY".into(),
                value: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn registers_all_before_booting_any() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let providers: Vec<Box<dyn ServiceProvider>> = vec![
            Box::new(Recording { label: "a", events: events.clone() }),
            Box::new(Recording { label: "b", events: events.clone() }),
        ];

        Application::boot(AppConfig::default(), providers).await.unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec!["register a", "register b", "boot a", "boot b"]
        );
    }

    #[tokio::test]
    async fn exposes_config_and_bindings() {
        let config = AppConfig {
            environment: Environment::Testing,
            ..AppConfig::default()
        };
        let app = Application::boot(config, vec![Box::new(AppServiceProvider)]).await.unwrap();

        assert_eq!(app.config().unwrap().environment, Environment::Testing);
        assert!(app.exception_layer().is_ok());
        assert!(app.get_container().make::<Responder>().is_ok());
    }

    #[tokio::test]
    async fn register_failure_aborts_boot() {
        let result = Application::boot(AppConfig::default(), vec![Box::new(Failing)]).await;
        assert!(matches!(result, Err(TenantryError::InvalidConfig { .. })));
    }

    #[tokio::test]
    async fn exception_layer_needs_a_filter() {
        let app = Application::boot(AppConfig::default(), Vec::new()).await.unwrap();
        assert!(app.exception_layer().is_err());
    }
}
