use crate::common::Responder;
use crate::config::AppConfig;
use crate::di::Container;
use crate::error::Result;
use crate::exception::{ExceptionFilter, Handler};
use crate::lang::{MessageCatalog, Translator};
use crate::log::{ExceptionLogger, TracingLogger};
use crate::provider::ServiceProvider;
use async_trait::async_trait;
use std::sync::Arc;

/// Binds the exception handler and the services it depends on.
///
/// Bindings that already exist (a custom catalog or logger registered by an
/// earlier provider) are left alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppServiceProvider;

impl AppServiceProvider {
    fn load_catalog(config: &AppConfig) -> Result<MessageCatalog> {
        let mut catalog = MessageCatalog::builtin()?;
        if let Some(dir) = &config.lang_path {
            let loaded = catalog.load_dir(dir)?;
            tracing::debug!(path = %dir.display(), ?loaded, "Loaded locale files");
        }
        catalog.set_fallback(&config.fallback_locale)?;
        Ok(catalog)
    }
}

#[async_trait]
impl ServiceProvider for AppServiceProvider {
    fn register(&self, container: &mut Container) -> Result<()> {
        let config = container.make::<AppConfig>()?;

        if !container.contains::<MessageCatalog>() {
            container.instance(Arc::new(Self::load_catalog(&config)?));
        }
        if !container.contains::<dyn ExceptionLogger>() {
            container.instance::<dyn ExceptionLogger>(Arc::new(TracingLogger));
        }

        container.bind::<dyn ExceptionFilter, _>(|c| {
            Ok(Arc::new(Handler::from_container(c)?) as Arc<dyn ExceptionFilter>)
        });
        container.bind::<Responder, _>(|c| {
            let config = c.make::<AppConfig>()?;
            let translator = Translator::new(c.make::<MessageCatalog>()?, config.locale.clone())?;
            Ok(Arc::new(Responder::new(translator)))
        });
        Ok(())
    }

    async fn boot(&self, container: &Container) -> Result<()> {
        let config = container.make::<AppConfig>()?;
        container.make::<MessageCatalog>()?.ensure_locale(&config.locale)?;
        container.make::<dyn ExceptionFilter>()?;

        tracing::info!(
            app = %config.name,
            environment = %config.environment,
            locale = %config.locale,
            "Exception handler registered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::{RequestContext, Throwable, ValidationException};
    use axum::http::StatusCode;

    fn container_with(config: AppConfig) -> Container {
        let mut container = Container::new();
        container.instance(Arc::new(config));
        container
    }

    #[tokio::test]
    async fn registers_handler_and_responder() {
        let mut container = container_with(AppConfig::default());
        AppServiceProvider.register(&mut container).unwrap();
        AppServiceProvider.boot(&container).await.unwrap();

        let filter = container.make::<dyn ExceptionFilter>().unwrap();
        let exception = ValidationException::new()
            .with_error("email", "The email field is required.");
        let response = filter.catch(&Throwable::new(exception), &RequestContext::json());
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(container.make::<Responder>().is_ok());
        assert!(container.contains::<dyn ExceptionLogger>());
    }

    #[tokio::test]
    async fn keeps_existing_catalog() {
        let mut catalog = MessageCatalog::builtin().unwrap();
        let lines = catalog_lines("es");
        catalog.add_locale("es", lines).unwrap();

        let mut container = container_with(AppConfig {
            locale: "es".into(),
            ..AppConfig::default()
        });
        container.instance(Arc::new(catalog));
        AppServiceProvider.register(&mut container).unwrap();
        AppServiceProvider.boot(&container).await.unwrap();

        let responder = container.make::<Responder>().unwrap();
        assert_eq!(responder.translator().locale(), "es");
    }

    #[tokio::test]
    async fn boot_rejects_unknown_locale() {
        let mut container = container_with(AppConfig {
            locale: "de".into(),
            ..AppConfig::default()
        });
        AppServiceProvider.register(&mut container).unwrap();
        assert!(AppServiceProvider.boot(&container).await.is_err());
    }

    #[test]
    fn register_requires_config() {
        let mut container = Container::new();
        assert!(AppServiceProvider.register(&mut container).is_err());
    }

    fn catalog_lines(locale: &str) -> std::collections::HashMap<String, String> {
        use strum::IntoEnumIterator;
        crate::lang::MessageKey::iter()
            .map(|key| (key.as_ref().to_string(), format!("{locale}:{}", key.as_ref())))
            .collect()
    }
}
