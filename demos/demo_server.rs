use anyhow::Context;
use axum::middleware;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tenantry::prelude::*;
use tenantry::tenancy::TenantWithDatabase;
use tower_http::trace::TraceLayer;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
struct CreateWidget {
    #[validate(length(min = 1))]
    name: String,
    #[validate(range(min = 1, max = 100))]
    quantity: u32,
}

async fn show_widget(Path(id): Path<u64>) -> Result<Json<Value>, Throwable> {
    match id {
        1 => Ok(Json(json!({ "id": 1, "name": "Sprocket" }))),
        _ => Err(ModelNotFoundException::new("Widget").with_ids([id]).into()),
    }
}

async fn create_widget(
    Inject(responder): Inject<Responder>,
    Json(input): Json<CreateWidget>,
) -> Result<Response, Throwable> {
    input.validate().map_err(ValidationException::from)?;
    Ok(responder
        .created(None, Some(json!({ "name": input.name, "quantity": input.quantity })))
        .into_response())
}

async fn whoami(
    axum::Extension(tenant): axum::Extension<CurrentTenant>,
    State(app): State<Application>,
) -> Result<Json<Value>, Throwable> {
    let config = app.config()?;
    Ok(Json(json!({
        "id": tenant.id(),
        "database": tenant.database_name(&config.tenancy),
    })))
}

async fn throttled() -> Result<(), Throwable> {
    Err(ThrottleRequestsException::new().into())
}

async fn report() -> Result<(), Throwable> {
    Err(QueryException::new("relation \"reports\" does not exist")
        .with_sql("select * from reports where id = ?", ["7"])
        .into())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().context("Failed to read configuration")?;
    let app = Application::boot(config, vec![Box::new(AppServiceProvider)])
        .await
        .context("Failed to boot application")?;

    let registry = Arc::new(TenantRegistry::new());
    let mut tenant = Tenant::with_id("acme");
    tenant.add_domain("localhost");
    registry.insert(tenant)?;

    let tenant_routes = Router::new()
        .route("/whoami", get(whoami))
        .route_layer(middleware::from_fn_with_state(registry, identify_tenant_by_domain));

    let router = Router::new()
        .route("/widgets", post(create_widget))
        .route("/widgets/{id}", get(show_widget))
        .route("/throttled", get(throttled))
        .route("/report", get(report))
        .merge(tenant_routes)
        .layer(app.exception_layer()?)
        .layer(TraceLayer::new_for_http())
        .with_state(app);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server running on http://127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, router).await?;
    Ok(())
}
