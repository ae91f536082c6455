use clap::Subcommand;
use serde_json::Value;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check that the API server and its database are reachable")]
    Ping,
}

pub async fn handle(
    cmd: ServerCommands,
    output_format: OutputFormat,
    base_url: &str,
) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Ping => {
            let url = format!("{}/health", base_url.trim_end_matches('/'));
            let response = match reqwest::get(&url).await {
                Ok(r) => r,
                Err(e) => {
                    output_error(&output_format, &format!("Server unreachable: {}", e))?;
                    anyhow::bail!("server unreachable");
                }
            };

            let status = response.status();
            let body = response.json::<Value>().await.unwrap_or(Value::Null);

            if status.is_success() {
                output_success(&output_format, &format!("Server healthy at {}", url), Some(body))
            } else {
                output_error(
                    &output_format,
                    &format!("Server degraded ({}): {}", status.as_u16(), body),
                )?;
                anyhow::bail!("server degraded");
            }
        }
    }
}
