//! skill-cli 命令行工具：在本地运行技能，处理平台请求 JSON 或直接播报一句话。
//!
//! Usage:
//!   skill-cli handle [<request.json>]        Handle a platform request (stdin if no file)
//!   skill-cli say <text> [--diagnostics]     Resolve one phrase through the audio pipeline
//!   skill-cli config                         Show the effective configuration

use anyhow::{bail, Context};
use custom_tts_skill::skill::SkillContext;
use custom_tts_skill::SkillConfig;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries JSON only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "handle" => cmd_handle(&args[2..]).await,
        "say" => cmd_say(&args[2..]).await,
        "config" => cmd_config(),
        "version" | "--version" | "-V" => {
            println!("skill-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"skill-cli: custom voice skill runner

USAGE:
    skill-cli <COMMAND> [OPTIONS]

COMMANDS:
    handle [<request.json>]     Handle a platform request read from a file or stdin
    say <text> [--diagnostics]  Resolve one phrase and print the markup
    config                      Show the effective configuration
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    GITHUB_AUDIO_URL, GITHUB_REPO, S3_BUCKET, S3_REGION, S3_TIMEOUT_SECS, TTS_VOICE,
    TTS_BASE_URL, TTS_TIMEOUT_MS, RUST_LOG"#
    );
}

async fn cmd_handle(args: &[String]) -> anyhow::Result<()> {
    let raw = match args.first() {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading request from stdin")?;
            buf
        }
    };
    let request: serde_json::Value = serde_json::from_str(&raw).context("parsing request JSON")?;

    let ctx = SkillContext::from_env().await?;
    let envelope = ctx.skill.handle_request(&request).await;
    println!("{}", serde_json::to_string_pretty(&envelope.to_platform_json())?);
    Ok(())
}

async fn cmd_say(args: &[String]) -> anyhow::Result<()> {
    let diagnostics = args.iter().any(|a| a == "--diagnostics");
    let text = args
        .iter()
        .filter(|a| a.as_str() != "--diagnostics")
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    if text.trim().is_empty() {
        bail!("say requires some text");
    }

    let ctx = SkillContext::from_env().await?;
    let resolved = ctx.skill.pipeline().resolve(&text, diagnostics).await;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    let cfg = SkillConfig::from_env()?;
    println!("skill name:      {}", cfg.skill_name);
    println!(
        "static URL:      {}",
        cfg.static_audio_url.as_deref().unwrap_or("(none)")
    );
    match &cfg.repository {
        Some(r) => println!(
            "directory:       {}/{}@{}:{}",
            r.owner, r.repo, r.branch, r.folder
        ),
        None => println!("directory:       (none)"),
    }
    match &cfg.store {
        Some(s) => println!("object store:    s3://{} ({})", s.bucket, s.region),
        None => println!("object store:    (none, inline only)"),
    }
    println!(
        "synthesis:       {}{} voice={} timeout={}ms",
        cfg.synthesis.base_url,
        cfg.synthesis.endpoint_path,
        cfg.synthesis.voice,
        cfg.synthesis.timeout.as_millis()
    );
    for path in &cfg.bundled_audio_paths {
        println!("bundled path:    {}", path.display());
    }
    Ok(())
}
