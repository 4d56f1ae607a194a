pub mod body;
pub mod generate_image;
pub mod responder;
pub mod routes;
pub mod static_files;

use actix_web::{middleware, web, App, HttpServer};
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    config::Config,
    genai::{GenAiImageClient, ImageGenerator},
};

/// Shared, read-only request context.
pub struct AppState {
    pub generator: Arc<dyn ImageGenerator>,
    pub static_root: PathBuf,
    pub body_limit: usize,
}

impl AppState {
    pub fn new(generator: Arc<dyn ImageGenerator>, static_root: PathBuf, body_limit: usize) -> Self {
        Self {
            generator,
            static_root,
            body_limit,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(GenAiImageClient::new(config.genai.clone())),
            config.static_root.clone(),
            config.body_limit,
        )
    }
}

/// Bind and run until the server stops. Bind failures are returned, not retried.
pub async fn run(config: Config) -> std::io::Result<()> {
    if !config.static_root.is_dir() {
        log::warn!(
            "Static root {} is not a directory; asset requests will 404",
            config.static_root.display()
        );
    }

    let state = web::Data::new(AppState::from_config(&config));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::new("%r %s %b %Dms"))
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?;

    log::info!("🌐 imagelab listening on http://{}", config.bind_address());

    server.run().await
}
