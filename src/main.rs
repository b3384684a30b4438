use ava_bulletin::utils::error::BulletinError;
use ava_bulletin::utils::logger;
use ava_bulletin::{BulletinPipeline, CliConfig, EtlEngine, LocalStorage, Vocabulary};
use clap::Parser;
use std::sync::Arc;

fn report_failure(context: &str, e: &BulletinError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    std::process::exit(e.severity().exit_code());
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init(cli.source.verbose, cli.source.log_json);

    tracing::info!("Starting ava-bulletin");
    tracing::debug!("CLI config: {:?}", cli);

    // 解析並驗證配置
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => report_failure("Configuration validation failed", &e),
    };
    tracing::info!(
        "Region {} ({}), activeAt {}",
        config.region_id,
        config.lang,
        config.active_at.to_rfc3339()
    );

    let storage = LocalStorage::new(String::new());
    let pipeline = BulletinPipeline::new(storage, config, Arc::new(Vocabulary::french()));
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Bulletin rendered");
            println!("✅ Bulletin rendered: {}", output_path);
        }
        Err(e @ BulletinError::RegionNotFound { .. }) => {
            // 當日無此區域公報，不寫檔也不算失敗
            tracing::warn!("{}", e);
            println!("{}", e.user_friendly_message());
        }
        Err(e) => report_failure("Bulletin render failed", &e),
    }
}
