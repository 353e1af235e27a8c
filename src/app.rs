/*
 * Responsibility
 * - Config読み込み → AccessGate 生成 → Router 組み立て
 * - Middleware の適用 (access gate → http)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, middleware, middleware::auth::AccessGate};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,bearer_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development では即落として気付けるようにする
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    let gate = AccessGate::new(&config.gate)?;
    tracing::info!(
        algorithm = %config.gate.algorithm,
        exclude = config.gate.exclude.len(),
        optional = config.gate.optional.len(),
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let app = build_router(gate, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(gate: AccessGate, config: &Config) -> Router {
    let router = Router::new().nest("/api/v1", api::v1::routes());
    let router = middleware::auth::apply(router, gate);
    middleware::http::apply(router, config)
}
