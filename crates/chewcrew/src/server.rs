//! `ChewcrewServer` builder and server loop.
//!
//! This is the entry point for running the room API over HTTP. It ties
//! the layers together: listener → router → handlers → room service.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::get;
use chewcrew_places::PlaceProvider;
use chewcrew_room::IdGenerator;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::handler::{end_room, get_room, new_room, vote};
use crate::{ChewcrewError, RoomService, ServiceConfig};

/// Builds the room API router around `service`.
///
/// Every response allows any origin. Use this directly to mount the API
/// inside a larger axum application.
pub fn router<P: PlaceProvider>(service: Arc<RoomService<P>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/room", get(get_room::<P>))
        .route("/room/new", get(new_room::<P>).post(new_room::<P>))
        .route("/room/vote", get(vote::<P>).post(vote::<P>))
        .route("/room/end", get(end_room::<P>).post(end_room::<P>))
        .layer(cors)
        .with_state(service)
}

/// Builder for configuring and starting a ChewCrew server.
///
/// # Example
///
/// ```rust,ignore
/// let server = ChewcrewServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build(StaticPlaces::new(["sushi", "pizza"]))
///     .await?;
/// server.run().await
/// ```
pub struct ChewcrewServerBuilder {
    bind_addr: String,
    service_config: ServiceConfig,
    ids: Option<Box<dyn IdGenerator>>,
}

impl ChewcrewServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            service_config: ServiceConfig::default(),
            ids: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the service configuration.
    pub fn service_config(mut self, config: ServiceConfig) -> Self {
        self.service_config = config;
        self
    }

    /// Replaces the random generator for room IDs and host secrets.
    pub fn id_generator(mut self, ids: impl IdGenerator) -> Self {
        self.ids = Some(Box::new(ids));
        self
    }

    /// Binds the listener and builds the server around `places`.
    pub async fn build<P: PlaceProvider>(
        self,
        places: P,
    ) -> Result<ChewcrewServer<P>, ChewcrewError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "HTTP listener bound");

        let mut service = RoomService::new(places, self.service_config);
        if let Some(ids) = self.ids {
            service = service.with_id_generator(ids);
        }

        Ok(ChewcrewServer {
            listener,
            service: Arc::new(service),
        })
    }
}

impl Default for ChewcrewServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound ChewCrew server, built by [`ChewcrewServerBuilder`].
///
/// Call [`run()`](Self::run) to start serving requests.
pub struct ChewcrewServer<P: PlaceProvider> {
    listener: TcpListener,
    service: Arc<RoomService<P>>,
}

impl<P: PlaceProvider> ChewcrewServer<P> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Returns the service behind the router.
    pub fn service(&self) -> Arc<RoomService<P>> {
        Arc::clone(&self.service)
    }

    /// Serves requests until the process is terminated.
    pub async fn run(self) -> Result<(), ChewcrewError> {
        self.run_until(std::future::pending()).await
    }

    /// Serves requests until `shutdown` completes, then drains in-flight
    /// requests and returns.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ChewcrewError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("ChewCrew server running");
        axum::serve(self.listener, router(self.service))
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("ChewCrew server stopped");
        Ok(())
    }
}
