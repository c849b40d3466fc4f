//! `config` command: show the effective configuration.

use anyhow::Result;
use console::style;

use gatechat_infra::filesystem::config_path;

use crate::state::AppState;

pub fn show(state: &AppState, json: bool) -> Result<()> {
    let config = &state.config;
    let token = if config.api_token.is_some() { "set" } else { "not set" };

    if json {
        let out = serde_json::json!({
            "data_dir": state.data_dir.display().to_string(),
            "config_file": config_path(&state.data_dir).display().to_string(),
            "base_url": config.base_url,
            "model": config.model,
            "api_token": token,
            "request_timeout_secs": config.request_timeout_secs,
            "stream_timeout_secs": config.stream_timeout_secs,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("── Gateway ──").dim());
    println!("  Base URL:  {}", style(&config.base_url).cyan());
    println!("  Model:     {}", style(&config.model).bold());
    println!("  Token:     {}", style(token).dim());
    println!();
    println!("  {}", style("── Timeouts ──").dim());
    println!("  Request:   {}s", config.request_timeout_secs);
    println!("  Stream:    {}s", config.stream_timeout_secs);
    println!();
    println!("  {}", style("── Files ──").dim());
    println!("  Data dir:  {}", style(state.data_dir.display()).dim());
    println!(
        "  Config:    {}",
        style(config_path(&state.data_dir).display()).dim()
    );
    println!();
    Ok(())
}
