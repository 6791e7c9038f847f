//! `da0` command-line entry point.
//!
//! Usage: `da0 [--connect] [PATH]`
//!
//! Opens the screen at `PATH` (default `/`) and prints it as JSON, preceded
//! by the session banners.  `--connect` runs the wallet sign-in first.

use anyhow::{anyhow, Context};
use tracing::info;

use da0_client::config::ClientConfig;
use da0_client::display;
use da0_client::routes::Route;
use da0_client::state::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Logging and configuration
    // -----------------------------------------------------------------------
    da0_client::init_tracing();
    info!("Starting da0 v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    info!(?config, "Loaded configuration");

    let mut connect = false;
    let mut path = "/".to_string();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--connect" => connect = true,
            other => path = other.to_string(),
        }
    }
    let route = Route::parse(&path).ok_or_else(|| anyhow!("unknown route: {path}"))?;

    // -----------------------------------------------------------------------
    // 2. Backend, wallet and session
    // -----------------------------------------------------------------------
    let store = config
        .build_store()
        .context("failed to open governance store")?;
    let wallet = config.build_wallet();
    let app = App::start(config, store, wallet).await;

    if connect {
        app.session().connect().await;
    }

    // -----------------------------------------------------------------------
    // 3. Render
    // -----------------------------------------------------------------------
    let session = app.session().session();
    for banner in display::banners(&session) {
        println!("! {banner}");
    }
    match display::account_badge(&session) {
        Some(badge) => println!("account: {badge}"),
        None => println!("[{}]", display::connect_button(&session).label),
    }
    if route == Route::Home {
        println!("[{}]", display::hero_button(&session).label);
    }

    if let Some(view) = app.open(&route).await {
        println!("{}", serde_json::to_string_pretty(&view)?);
    }

    app.shutdown();
    Ok(())
}
