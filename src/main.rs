use etcd_console::{app::app, config, database, state::AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting etcd-console in {:?} mode", config.environment);

    let pool = database::connect_pool(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect database: {}", e));

    let state = AppState::production(pool, config);
    let app = app(state);

    let bind_addr = format!("{}:{}", config.http.address, config.http.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("etcd-console listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
