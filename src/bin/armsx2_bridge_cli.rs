//! armsx2-bridge CLI: inspect bridge configuration and provider resolution.
//!
//! Usage:
//!   armsx2-bridge-cli status [--config <path>]     Show the resolved configuration
//!   armsx2-bridge-cli channels                     List event channel names
//!   armsx2-bridge-cli fallbacks [--config <path>]  Print what every accessor resolves to without a provider
//!   armsx2-bridge-cli version                      Show version information

use std::path::PathBuf;

use anyhow::Context;
use armsx2_bridge::{
    get_provider_registry, Bridge, BridgeConfig, Channel, ProviderRegistry, SettingType,
    Subscription,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "status" => cmd_status(&args[2..]),
        "channels" => {
            cmd_channels();
            Ok(())
        }
        "fallbacks" => cmd_fallbacks(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("armsx2-bridge-cli {}", env!("CARGO_PKG_VERSION"));
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
        r#"armsx2-bridge-cli: ARMSX2 bridge diagnostics

USAGE:
    armsx2-bridge-cli <COMMAND> [OPTIONS]

COMMANDS:
    status [--config <path>]       Show the resolved configuration
    channels                       List event channel names
    fallbacks [--config <path>]    Print what every accessor resolves to without a provider
    version                        Show version information
    help                           Show this help message

ENVIRONMENT:
    ARMSX2_BRIDGE_MODULE           Provider name to resolve
    ARMSX2_DEV                     Development mode (1/0)
    ARMSX2_LOG                     Log filter (RUST_LOG takes precedence)"#
    );
}

fn resolve_config_path(args: &[String]) -> Option<PathBuf> {
    args.iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}

fn load_config(args: &[String]) -> anyhow::Result<BridgeConfig> {
    let config = match resolve_config_path(args) {
        Some(path) => BridgeConfig::from_yaml_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BridgeConfig::from_env().context("reading environment")?,
    };
    armsx2_bridge::logging::init(&config);
    Ok(config)
}

fn cmd_status(args: &[String]) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let registry = get_provider_registry();

    println!("module:     {}", config.module_name);
    println!("dev mode:   {}", config.dev_mode);
    println!("log filter: {}", config.log_filter);
    // Providers register in-process; a standalone CLI process has none.
    println!("registered providers in this process: {}", registry.len());
    Ok(())
}

fn cmd_channels() {
    for channel in Channel::ALL {
        println!("{channel}");
    }
}

async fn cmd_fallbacks(args: &[String]) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let bridge = Bridge::from_registry(&ProviderRegistry::new(), &config);
    for (accessor, value) in fallback_report(&bridge).await {
        println!("{accessor:<36} {value}");
    }
    Ok(())
}

/// Call every accessor and subscription on `bridge`, rendering each result.
async fn fallback_report(bridge: &Bridge) -> Vec<(&'static str, String)> {
    const ISO: &str = "/games/game.iso";
    let subscribed = |s: Option<Subscription>| {
        let state = if s.is_some() { "subscribed" } else { "no emitter" };
        state.to_string()
    };

    vec![
        ("is_available", bridge.is_available().to_string()),
        (
            "get_setting",
            format!("{:?}", bridge.get_setting("EmuCore", "Cheats", SettingType::Bool).await),
        ),
        (
            "set_setting",
            bridge
                .set_setting("EmuCore", "Cheats", SettingType::Bool, true)
                .await
                .to_string(),
        ),
        ("refresh_bios", format!("{:?}", bridge.refresh_bios().await)),
        ("has_valid_vm", bridge.has_valid_vm().await.to_string()),
        ("get_data_root", format!("{:?}", bridge.get_data_root().await)),
        (
            "set_data_root_override",
            format!("{:?}", bridge.set_data_root_override("/data").await),
        ),
        (
            "get_retro_achievements_state",
            format!("{:?}", bridge.get_retro_achievements_state().await),
        ),
        (
            "refresh_retro_achievements_state",
            format!("{:?}", bridge.refresh_retro_achievements_state().await),
        ),
        (
            "login_retro_achievements",
            format!("{:?}", bridge.login_retro_achievements("user", "").await),
        ),
        (
            "logout_retro_achievements",
            format!("{:?}", bridge.logout_retro_achievements().await),
        ),
        (
            "set_retro_achievements_enabled",
            format!("{:?}", bridge.set_retro_achievements_enabled(false).await),
        ),
        (
            "set_retro_achievements_hardcore",
            format!("{:?}", bridge.set_retro_achievements_hardcore(false).await),
        ),
        (
            "get_discord_profile",
            format!("{:?}", bridge.get_discord_profile().await),
        ),
        (
            "begin_discord_login",
            format!("{:?}", bridge.begin_discord_login().await),
        ),
        ("logout_discord", format!("{:?}", bridge.logout_discord().await)),
        (
            "set_pad_vibration",
            format!("{:?}", bridge.set_pad_vibration(false).await),
        ),
        (
            "convert_iso_to_chd",
            bridge.convert_iso_to_chd(ISO).await.to_string(),
        ),
        (
            "subscribe_to_retro_achievements",
            subscribed(bridge.subscribe_to_retro_achievements(|_| {})),
        ),
        (
            "subscribe_to_retro_achievements_login",
            subscribed(bridge.subscribe_to_retro_achievements_login(|_| {})),
        ),
        (
            "subscribe_to_discord",
            subscribed(bridge.subscribe_to_discord(|_| {})),
        ),
    ]
}
