use reportdesk_api::{landlock, setup, telemetry};
use reportdesk_core::Config;

// Use mimalloc as the global allocator for lower fragmentation inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    telemetry::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Sandbox before the runtime spawns its worker threads so they inherit the ruleset.
    landlock::linux::init(&config.reports_directory);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let (_state, router) = setup::initialize_app(config.clone()).await?;
            setup::server::start_server(&config, router).await
        })
}
