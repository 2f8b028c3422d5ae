use std::net::SocketAddr;
use axum::Router;
use lambda_http::{run, Error};
use tracing::info;
use library_catalog::catalog::controller::build_router;
use library_catalog::catalog::factory::create_catalog_service;
use library_catalog::core::controller::AppState;
use library_catalog::core::domain::Configuration;
use library_catalog::utils::logs::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let config = Configuration::from_env()?;
    let svc = create_catalog_service(&config).await;
    let state = AppState::new(config.clone(), svc);

    if config.lambda {
        info!(store = ?config.store, table = config.table_name.as_str(), "starting catalog lambda");
        let app: Router<(), lambda_http::Body> = build_router(state);
        run(app).await
    } else {
        let addr: SocketAddr = config.bind_addr.parse()?;
        info!(store = ?config.store, %addr, "starting catalog server");
        let app: Router = build_router(state);
        axum::Server::bind(&addr).serve(app.into_make_service()).await?;
        Ok(())
    }
}
