use mimalloc::MiMalloc;
use modules::{
    context::{status::STARTED_AT, Initialize},
    error::JmapGateResult,
    jmap::{client::JmapClient, transport::HttpTransport},
    logger,
    rest::start_http_server,
    settings::cli::SETTINGS,
};
use std::sync::LazyLock;
use tracing::{error, info};

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

static LOGO: &str = r#"
    _                                 _
   (_)_ __ ___   __ _ _ __   __ _  __ _| |_ ___
   | | '_ ` _ \ / _` | '_ \ / _` |/ _` | __/ _ \
   | | | | | | | (_| | |_) | (_| | (_| | ||  __/
  _/ |_| |_| |_|\__,_| .__/ \__, |\__,_|\__\___|
 |__/                |_|    |___/
"#;

#[tokio::main]
async fn main() -> JmapGateResult<()> {
    logger::initialize_logging();
    LazyLock::force(&STARTED_AT);
    info!("{}", LOGO);
    info!("Starting jmapgate");
    info!("Version:  {}", jmapgate_version!());
    info!("JMAP API: {}", SETTINGS.jmapgate_jmap_api_url);

    if let Err(error) = initialize().await {
        eprintln!("{:?}", error);
        return Err(error);
    }

    if let Err(e) = start_http_server().await {
        error!("Failed to start REST server: {}", e);
        return Err(e);
    }
    Ok(())
}

async fn initialize() -> JmapGateResult<()> {
    JmapClient::<HttpTransport>::initialize().await?;
    Ok(())
}
