pub mod config;
pub mod error;
pub mod handlers;
pub mod services;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::Config;
use services::RazorpayClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub razorpay: RazorpayClient,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let razorpay = RazorpayClient::new(config.razorpay.clone());

        let state = AppState {
            config: config.clone(),
            razorpay,
        };

        let router = Router::new()
            .route("/health", get(handlers::health_check))
            .route(
                "/api/payments/CreateOrder",
                post(handlers::payments::create_order),
            )
            .route(
                "/api/payments/CapturePayment",
                post(handlers::payments::capture_payment),
            )
            .layer(CorsLayer::permissive())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                }),
            )
            .with_state(state);

        let host: IpAddr = config
            .server
            .host
            .parse()
            .context("GATEWAY_HOST must be a valid IP address")?;
        let addr = SocketAddr::new(host, config.server.port);

        // Port 0 binds a random free port, which the tests rely on.
        let listener = TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        tracing::info!("Listening on {}", self.listener.local_addr()?);
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }
}
