//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{EdgeError, EdgeResult};
use crate::ui::{self, UiContext};

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> EdgeResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config),
        Some(ConfigAction::Path) => show_path(manager),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) {
    let toml =
        toml::to_string_pretty(config).unwrap_or_else(|_| "Error serializing config".to_string());
    println!("{}", toml);
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

async fn init_config(manager: &ConfigManager, force: bool) -> EdgeResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    let config = Config::default();
    manager.save(&config).await?;

    ui::step_ok_detail(
        &ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );

    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> EdgeResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();

    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "verbose"] => config.general.verbose = parse_bool(value)?,
        ["general", "log_format"] => config.general.log_format = value.to_string(),
        ["general", "event_log"] => config.general.event_log = parse_bool(value)?,

        ["worker", "partition"] => config.worker.partition = value.to_string(),
        ["worker", "origin"] => config.worker.origin = value.to_string(),
        ["worker", "shell_manifest"] => config.worker.shell_manifest = parse_list(value),

        ["intercept", "api_prefixes"] => config.intercept.api_prefixes = parse_list(value),
        ["intercept", "internal_markers"] => config.intercept.internal_markers = parse_list(value),
        ["intercept", "bust_params"] => config.intercept.bust_params = parse_list(value),

        ["fetch", "timeout_secs"] => config.fetch.timeout_secs = parse_u64(value)?,
        ["fetch", "user_agent"] => config.fetch.user_agent = value.to_string(),

        ["heuristics", "vm_renderers"] => config.heuristics.vm_renderers = parse_list(value),
        ["heuristics", "vm_resolutions"] => config.heuristics.vm_resolutions = parse_list(value),
        ["heuristics", "anonymity_markers"] => {
            config.heuristics.anonymity_markers = parse_list(value)
        }
        ["heuristics", "headless_markers"] => {
            config.heuristics.headless_markers = parse_list(value)
        }

        ["heuristics", "weights", "vm"] => config.heuristics.weights.vm = parse_u32(value)?,
        ["heuristics", "weights", "vpn"] => config.heuristics.weights.vpn = parse_u32(value)?,
        ["heuristics", "weights", "cookies_disabled"] => {
            config.heuristics.weights.cookies_disabled = parse_u32(value)?
        }
        ["heuristics", "weights", "storage_disabled"] => {
            config.heuristics.weights.storage_disabled = parse_u32(value)?
        }
        ["heuristics", "weights", "headless"] => {
            config.heuristics.weights.headless = parse_u32(value)?
        }

        _ => {
            ui::step_error_detail(&ctx, "Unknown config key", key);
            ui::remark(&ctx, "Valid keys:");
            print_valid_keys();
            return Err(EdgeError::User(format!("Unknown config key: {key}")));
        }
    }

    manager.save(&config).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

fn parse_bool(value: &str) -> EdgeResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(EdgeError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_u32(value: &str) -> EdgeResult<u32> {
    value
        .parse()
        .map_err(|_| EdgeError::User(format!("Invalid number: {}", value)))
}

fn parse_u64(value: &str) -> EdgeResult<u64> {
    value
        .parse()
        .map_err(|_| EdgeError::User(format!("Invalid number: {}", value)))
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn print_valid_keys() {
    let keys = [
        "general.verbose",
        "general.log_format",
        "general.event_log",
        "worker.partition",
        "worker.origin",
        "worker.shell_manifest",
        "intercept.api_prefixes",
        "intercept.internal_markers",
        "intercept.bust_params",
        "fetch.timeout_secs",
        "fetch.user_agent",
        "heuristics.vm_renderers",
        "heuristics.vm_resolutions",
        "heuristics.anonymity_markers",
        "heuristics.headless_markers",
        "heuristics.weights.vm",
        "heuristics.weights.vpn",
        "heuristics.weights.cookies_disabled",
        "heuristics.weights.storage_disabled",
        "heuristics.weights.headless",
    ];

    for key in keys {
        eprintln!("  {}", key);
    }
}
