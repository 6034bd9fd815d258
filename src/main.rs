use channel_map_loader::utils::{logger, validation::Validate};
use channel_map_loader::{
    ChannelMapPipeline, CliConfig, EtlEngine, EtlError, GoogleSheetSource, LocalStorage,
};
use clap::Parser;

fn exit_with(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Channel map export failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting channel-map-loader");

    // 合併並驗證配置
    let config = match cli.resolve().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            exit_with(&e);
        }
    };
    tracing::debug!("Resolved config: {:?}", config);

    let source = match GoogleSheetSource::new(config.source.clone()) {
        Ok(source) => source,
        Err(e) => exit_with(&e),
    };
    let storage = LocalStorage::new(".");
    let pipeline = ChannelMapPipeline::new(source, storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Channel map export completed successfully!");
            println!("✅ Channel map written to: {}", output_path);
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
