//! Native development build of the viewer
//!
//! Opens the viewer in a desktop window. Set `VITRINA_CONFIG` to a JSON file to
//! use a page configuration.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use tracing_subscriber::FmtSubscriber;

    let loaded = vitrina_web::load_page_config();
    let level = loaded
        .as_ref()
        .map(|config| vitrina_web::log_level(&config.viewer.log_level))
        .unwrap_or(tracing::Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Using default page configuration: {:#}", e);
        Default::default()
    });

    vitrina_web::run(config);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
