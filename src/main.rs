//! Sage 命令行入口
//!
//! 用法：`sage [--config <path>] <topic...>`
//! 生成的报告写入 `<out_dir>/report-<时间戳>.md`，并打印 token 用量与费用估算。

use std::path::PathBuf;

use anyhow::Context;
use sage::{config::load_config, observability, workflow};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let (config_path, topic) = parse_args(std::env::args().skip(1))?;
    let cfg = load_config(config_path).context("Failed to load config")?;

    let output = workflow::run(&topic, &cfg)
        .await
        .context("Report generation failed")?;

    std::fs::create_dir_all(&cfg.app.out_dir)
        .with_context(|| format!("Failed to create {}", cfg.app.out_dir.display()))?;
    let path = cfg.app.out_dir.join(format!(
        "report-{}.md",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));
    std::fs::write(&path, &output.content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{}", output.title);
    println!("Report written to {}", path.display());
    println!("Sources: {}", output.unique_sources.len());

    let (per_model, total_cost) = output.token_usage.estimate_cost(&cfg.llm.prices);
    for (model, count) in output.token_usage.iter() {
        let cost = per_model.get(model).copied().unwrap_or(0.0);
        println!(
            "  {:<40} in {:>8}  out {:>8}  ${:.4}",
            model, count.input_tokens, count.output_tokens, cost
        );
    }
    println!("Estimated cost: ${:.4}", total_cost);

    Ok(())
}

fn parse_args(args: impl Iterator<Item = String>) -> anyhow::Result<(Option<PathBuf>, String)> {
    let mut config_path = None;
    let mut words = Vec::new();
    let mut args = args;
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            let path = args.next().context("--config requires a path")?;
            config_path = Some(PathBuf::from(path));
        } else {
            words.push(arg);
        }
    }

    let topic = words.join(" ");
    anyhow::ensure!(!topic.trim().is_empty(), "usage: sage [--config <path>] <topic...>");
    Ok((config_path, topic))
}
