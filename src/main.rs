use clap::Parser;
use product_search_api::domain::ConfigProvider;
use product_search_api::utils::validation::{validate_socket_addr, Validate};
use product_search_api::utils::{error::Result as ApiResult, logger};
use product_search_api::{
    build_router, CliConfig, ProductService, RawStoreClient, StoreTransport, TomlConfig,
    TypedStoreClient,
};
use std::sync::Arc;

/// 讀取 --config 指定的檔案 (只讀一次)
fn read_config_file(cli: &CliConfig) -> ApiResult<Option<TomlConfig>> {
    cli.config.as_ref().map(TomlConfig::from_file).transpose()
}

/// 日誌設定：檔案中的 [logging] 與命令列旗標取聯集
fn logging_flags(cli: &CliConfig, file: Option<&TomlConfig>) -> (bool, bool) {
    match file {
        Some(file) => (cli.verbose || file.verbose(), cli.log_json || file.log_json()),
        None => (cli.verbose, cli.log_json),
    }
}

fn load_config(cli: CliConfig, file: Option<TomlConfig>) -> ApiResult<Box<dyn ConfigProvider>> {
    match file {
        Some(config) => {
            config.validate()?;
            Ok(Box::new(config))
        }
        None => {
            cli.validate()?;
            Ok(Box::new(cli))
        }
    }
}

fn exit_on_config_error(e: impl std::fmt::Display) -> ! {
    tracing::error!("❌ Configuration validation failed: {}", e);
    eprintln!("❌ {}", e);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    let file = read_config_file(&cli).unwrap_or_else(|e| exit_on_config_error(e));

    let (verbose, json) = logging_flags(&cli, file.as_ref());
    logger::init_logger(verbose, json);

    tracing::info!("Starting product-search-api");
    if let Some(path) = &cli.config {
        tracing::info!("Loaded configuration from {}", path.display());
    }

    let config = load_config(cli, file).unwrap_or_else(|e| exit_on_config_error(e));

    let addr = validate_socket_addr("bind", config.bind_address())?;
    let transport = StoreTransport::new(&*config)?;
    tracing::info!("Document store: {}", config.store_url());

    let raw_client = RawStoreClient::new(transport.clone());
    match raw_client.info().await {
        Ok(info) => tracing::info!(
            "Connected to cluster {} (version {})",
            info["cluster_name"].as_str().unwrap_or("<unknown>"),
            info["version"]["number"].as_str().unwrap_or("<unknown>")
        ),
        Err(e) => tracing::warn!("Document store not reachable yet: {}", e),
    }
    let typed_client = TypedStoreClient::new(transport);

    let app = build_router(
        Arc::new(ProductService::new(raw_client)),
        Arc::new(ProductService::new(typed_client)),
        config.query_passthrough(),
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
