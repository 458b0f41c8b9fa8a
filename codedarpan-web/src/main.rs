#![deny(missing_docs)]
//! CodeDarpan web front-end.
//!
//! Serves the URL form, the rendered report and the certificate download.

mod config;
mod pages;
mod routes;

#[cfg(not(test))]
use actix_web::{App, HttpServer, web};
#[cfg(not(test))]
use codedarpan_core::{CertificateExporter, HttpAnalysisClient, PlottersRasterizer};
#[cfg(not(test))]
use dotenvy::dotenv;

#[cfg(not(test))]
use crate::config::ServerConfig;
#[cfg(not(test))]
use crate::routes::{AppState, analyze, certificate, index};

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().map_err(invalid_input)?;
    let client = HttpAnalysisClient::new(&config.api_url).map_err(invalid_input)?;
    let exporter = match PlottersRasterizer::discover(config.font.as_deref()) {
        Ok(rasterizer) => Some(CertificateExporter::new(Box::new(rasterizer))),
        Err(err) => {
            log::warn!("certificate download disabled: {err}");
            None
        }
    };
    let state = web::Data::new(AppState::new(Box::new(client), exporter));

    log::info!(
        "serving on http://{}:{} (analysis service {})",
        config.host,
        config.port,
        config.api_url
    );
    let listen = (config.host, config.port);

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .app_data(state.clone())
                .service(index)
                .service(analyze)
                .service(certificate)
        })
        .bind(listen)?
        .run()
        .await
    })
}

#[cfg(not(test))]
fn invalid_input<E: std::fmt::Display>(err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
}

#[cfg(test)]
fn main() {}
