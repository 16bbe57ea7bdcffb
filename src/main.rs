//! Merch Forge server binary.

use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use merch_forge::adapters::ai::{OpenAiClient, OpenAiConfig};
use merch_forge::adapters::commerce::{PrintifyApiConfig, PrintifyClient};
use merch_forge::adapters::http::{api_router, AppState};
use merch_forge::application::ChatService;
use merch_forge::config::AppConfig;

use secrecy::ExposeSecret;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let ai = build_ai_client(&config);
    let commerce = build_commerce_client(&config);
    let chat = Arc::new(ChatService::new(
        ai,
        commerce,
        config.printify.default_print_provider_id,
    ));

    let router = api_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                )))
                .layer(cors_layer(&config)),
        )
        .with_state(AppState::new(chat));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "merch-forge listening");
    axum::serve(listener, router).await?;

    Ok(())
}

fn build_ai_client(config: &AppConfig) -> Arc<OpenAiClient> {
    let api_key = config
        .ai
        .openai_api_key
        .as_ref()
        .map(|k| k.expose_secret().clone())
        .unwrap_or_default();

    Arc::new(OpenAiClient::new(
        OpenAiConfig::new(api_key)
            .with_chat_model(config.ai.chat_model.clone())
            .with_image_model(config.ai.image_model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout()),
    ))
}

fn build_commerce_client(config: &AppConfig) -> Arc<PrintifyClient> {
    let api_token = config
        .printify
        .api_token
        .as_ref()
        .map(|t| t.expose_secret().clone())
        .unwrap_or_default();
    let shop_id = config.printify.shop_id.clone().unwrap_or_default();

    Arc::new(PrintifyClient::new(
        PrintifyApiConfig::new(api_token, shop_id)
            .with_base_url(config.printify.base_url.clone())
            .with_timeout(config.printify.timeout()),
    ))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
