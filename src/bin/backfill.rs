use anyhow::Context;
use ava_bulletin::utils::logger;
use ava_bulletin::{Backfill, BackfillArgs, BulletinPipeline, LocalStorage, Vocabulary};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = BackfillArgs::parse();

    // 初始化日誌
    logger::init(args.source.verbose, args.source.log_json);

    let plan = args.resolve().context("invalid backfill configuration")?;
    tracing::info!(
        "🚀 Backfilling {} days ({} to {}) into {}",
        plan.range.len(),
        plan.range.start(),
        plan.range.end(),
        plan.layout.history_dir.display()
    );

    let vocab = Arc::new(Vocabulary::french());
    let backfill = Backfill::new(plan.range, plan.layout.clone());
    let report = backfill
        .run(|day, out_file| {
            let config = plan.config_for(day, out_file)?;
            Ok(BulletinPipeline::new(
                LocalStorage::new(String::new()),
                config,
                Arc::clone(&vocab),
            ))
        })
        .await;

    for outcome in report.failed() {
        if let Err(e) = &outcome.result {
            eprintln!("Skip {}: {}", outcome.day, e.user_friendly_message());
        }
    }
    println!("{}", report.summary());

    // 一天都沒建成才算失敗
    if report.built() == 0 {
        anyhow::bail!("no day could be built");
    }
    Ok(())
}
