use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::infrastructure::AppContainer;
use crate::infrastructure::messaging::BackgroundProcessor;
use crate::presentation::http::{
    errors::json_payload_too_large,
    handlers::{DocumentHandler, MessageHandler, QueueHandler},
    routes::{document_routes, health_routes, message_routes, queue_routes},
};

pub struct HttpServer {
    message_handler: Arc<MessageHandler>,
    document_handler: Arc<DocumentHandler>,
    queue_handler: Arc<QueueHandler>,
    background_processor: BackgroundProcessor,
    port: u16,
}

impl HttpServer {
    pub fn new(
        message_handler: Arc<MessageHandler>,
        document_handler: Arc<DocumentHandler>,
        queue_handler: Arc<QueueHandler>,
        background_processor: BackgroundProcessor,
        port: u16,
    ) -> Self {
        Self {
            message_handler,
            document_handler,
            queue_handler,
            background_processor,
            port,
        }
    }

    pub fn from_container(container: &AppContainer) -> Self {
        Self::new(
            container.message_handler.clone(),
            container.document_handler.clone(),
            container.queue_handler.clone(),
            container.background_processor.clone(),
            container.config.port,
        )
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        // Outer cap only; the upload route enforces the real limit.
        let body_cap = self.document_handler.max_upload_bytes().saturating_mul(2) + 1024 * 1024;

        Router::new()
            .merge(health_routes())
            .merge(message_routes(self.message_handler.clone()))
            .merge(document_routes(self.document_handler.clone()))
            .merge(queue_routes(self.queue_handler.clone()))
            .layer(cors)
            .layer(RequestBodyLimitLayer::new(body_cap))
            .layer(axum::middleware::map_response(json_payload_too_large))
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                            tracing::info!(
                                "Received request: {} {}",
                                request.method(),
                                request.uri()
                            );
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<_>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                "Response: {} (took {} ms)",
                                response.status(),
                                latency.as_millis()
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                "Request failed: {:?} (took {} ms)",
                                error,
                                latency.as_millis()
                            );
                        },
                    ),
            )
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        let background_processor = self.background_processor.clone();
        tokio::spawn(async move {
            background_processor.start().await;
        });

        let app = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);
        axum::serve(listener, app).await
    }
}
