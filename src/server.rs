//! HTTP server: GraphQL endpoint, GraphiQL page, static images and CORS.
//!
//! Routes:
//! - `POST /`, `POST /graphql` — GraphQL over HTTP
//! - `GET /`, `GET /graphql` — GraphiQL IDE
//! - `GET <url_prefix>/<file>` — image files, when `images.serve` is on

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::GraphQL;
use axum::http::{header, HeaderValue, Method};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::catalog::mirror_images;
use crate::config::{CorsConfig, GalleryConfig};
use crate::error::{GalleryError, Result};
use crate::gallery::Gallery;
use crate::graphql::{build_schema, GallerySchema};

const GRAPHQL_PATH: &str = "/graphql";

/// Build the application router.
pub fn create_router(schema: GallerySchema, config: &GalleryConfig) -> Result<Router> {
    let graphql = get(graphiql).post_service(GraphQL::new(schema));
    let mut router = Router::new()
        .route("/", graphql.clone())
        .route(GRAPHQL_PATH, graphql);

    if config.images.serve {
        let prefix = static_prefix(&config.images.url_prefix)?;
        router = router.nest_service(prefix, ServeDir::new(&config.images.dir));
    }

    Ok(router
        .layer(cors_layer(&config.cors)?)
        .layer(TraceLayer::new_for_http()))
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

/// Static mount point for images. Nesting at the root is not allowed.
fn static_prefix(url_prefix: &str) -> Result<&str> {
    let prefix = url_prefix.trim_end_matches('/');
    if !prefix.starts_with('/') || prefix.len() < 2 {
        return Err(GalleryError::Config(format!(
            "images.url_prefix must be a non-root path starting with '/', got '{}'",
            url_prefix
        )));
    }
    Ok(prefix)
}

/// CORS policy from config. A `*` origin is only accepted without credentials.
fn cors_layer(cors: &CorsConfig) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(cors.allow_credentials);

    if cors.allowed_origins.iter().any(|o| o == "*") {
        if cors.allow_credentials {
            return Err(GalleryError::Config(
                "wildcard CORS origin cannot be combined with credentials".to_string(),
            ));
        }
        return Ok(layer.allow_origin(Any));
    }

    let origins = cors
        .allowed_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|_| GalleryError::Config(format!("invalid CORS origin '{}'", o)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(origins))
}

/// Startup work before serving: optional mirror, then open the gallery.
pub async fn prepare(config: &GalleryConfig) -> Result<Gallery> {
    if let Some(source) = config.images.mirror_from.clone() {
        let target = config.images.dir.clone();
        tokio::task::spawn_blocking(move || mirror_images(&source, &target)).await??;
    }

    if !config.images.dir.is_dir() {
        warn!(
            dir = %config.images.dir.display(),
            "images directory does not exist; queries will fail until it is created"
        );
    }

    Gallery::from_config(config)
}

/// Run the server until Ctrl-C.
pub async fn serve(config: GalleryConfig) -> Result<()> {
    let gallery = prepare(&config).await?;
    let app = create_router(build_schema(gallery), &config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(
        addr = %listener.local_addr()?,
        images = %config.images.dir.display(),
        origins = ?config.cors.allowed_origins,
        "gallery server ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gallery server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
