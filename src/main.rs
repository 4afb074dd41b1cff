use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;

use bangla_grapheme_server::config::Config;
use bangla_grapheme_server::server::{self, AppState};
use bangla_grapheme_server::{init_tracing, ModelKind, ModelRegistry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();
    let config = Config::parse();

    tracing::info!(models_dir = %config.models_dir.display(), "loading models");
    let registry = ModelRegistry::load(&config.models_dir);

    let loaded = registry.loaded();
    if loaded.is_empty() {
        tracing::warn!("no models were loaded; expected ONNX files:");
        for kind in ModelKind::ALL {
            tracing::warn!("  {}", kind.artifact_path(&config.models_dir).display());
        }
    } else {
        let names: Vec<&str> = loaded.iter().map(|kind| kind.as_str()).collect();
        tracing::info!(models = %names.join(", "), "models ready");
    }

    let state = web::Data::new(AppState::new(registry));
    let max_body_bytes = config.max_body_bytes;

    let (host, port) = config.bind_addr();
    tracing::info!("listening on http://{host}:{port}");

    let mut http = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .configure(server::configure(state.clone(), max_body_bytes))
            .default_service(web::to(server::not_found))
    });
    if let Some(workers) = config.workers {
        http = http.workers(workers);
    }

    http.bind((host, port))?.run().await
}
