extern crate sound_recommender;

use actix_web::http::header;
use actix_web::{http::ContentEncoding, middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use actix_web_prom::PrometheusMetrics;
use anyhow::Context;
use std::sync::Arc;

use sound_recommender::catalog::Catalog;
use sound_recommender::config::AppConfig;
use sound_recommender::endpoints::{json_config, query_config, routes, SharedHandles};
use sound_recommender::logging;
use sound_recommender::similarity::graph::SimilarityGraph;
use sound_recommender::similarity::recommender::Recommender;
use sound_recommender::store::RocksDBCatalogStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(config_path)?;
    logging::init(&config.log.level);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let qty_workers = config.server.num_workers;

    tracing::info!("Opening catalog store at {}", config.data.store_path);
    let store = RocksDBCatalogStore::new(&config.data.store_path)
        .with_context(|| format!("Could not open catalog store {}", config.data.store_path))?;

    let graph = Arc::new(SimilarityGraph::new());
    let recommender = Arc::new(Recommender::new(graph));
    let catalog = Arc::new(Catalog::new(Arc::new(store), recommender));

    if let Some(seed_path) = &config.data.seed_path {
        let qty_seeded = catalog.seed_if_empty(seed_path)?;
        tracing::info!(qty_seeded, "Seeding done");
    }
    catalog.warm_up()?;

    let prometheus = PrometheusMetrics::new("api", Some("/internal/prometheus"), None);
    let handles = SharedHandles::new(catalog, qty_workers);

    tracing::info!("Done. start httpd at http://{}", &bind_address);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::new(ContentEncoding::Identity))
            .wrap(prometheus.clone())
            .wrap(
                middleware::DefaultHeaders::new()
                    .header("Cache-Control", "no-cache, no-store, must-revalidate")
                    .header("Pragma", "no-cache")
                    .header("Expires", "0"),
            )
            .app_data(json_config())
            .app_data(query_config())
            .data(handles.clone())
            .configure(routes)
            .service(web::resource("/").route(web::get().to(|_req: HttpRequest| {
                HttpResponse::Found()
                    .header(header::LOCATION, "/internal")
                    .finish()
            })))
    })
    .workers(qty_workers)
    .bind(&bind_address)
    .with_context(|| format!("Could not bind server to address {}", &bind_address))?
    .run()
    .await?;

    Ok(())
}
