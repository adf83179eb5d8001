//! Job processing command
//!
//! Submits a job through the lifecycle controller and renders each state
//! change until the job settles. Ctrl-C resets the controller, which stops
//! polling.

use anyhow::{Context, Result};
use colored::*;
use retouch_core::domain::lifecycle::{LifecycleEvent, LifecycleState};
use retouch_lifecycle::LifecycleController;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Parse a single key=value pair
pub fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// JSON literal if it parses as one (numbers, booleans), plain string otherwise
fn param_value(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}

/// Run one job to completion
pub async fn run_job(
    config: &Config,
    image_url: String,
    function: &str,
    prompt: Option<String>,
    params: Vec<(String, String)>,
) -> Result<()> {
    let spec = config.catalog.find(function)?;

    let mut request = spec.request(image_url, config.api_key(), prompt);
    for (key, value) in params {
        request.parameters.insert(key, param_value(&value));
    }

    let client = Arc::new(config.client()?);
    let controller = LifecycleController::spawn(client, config.lifecycle.clone())
        .context("Invalid polling configuration")?;
    let mut events = controller.subscribe();

    println!(
        "{} {} ({})",
        "Processing".bold(),
        request.image_url.cyan(),
        spec.label
    );

    controller
        .start(request)
        .await
        .context("Could not start the job")?;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    debug!("Lifecycle state: {:?}", event.state);
                    print_event(&event);
                    if !event.state.is_in_flight() {
                        return finish(event.state);
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!("Skipped {} lifecycle events", missed);
                    continue;
                }
                Err(RecvError::Closed) => anyhow::bail!("Lifecycle controller stopped unexpectedly"),
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, resetting the job");
                controller.reset().await?;
                println!("{}", "Canceled, polling stopped.".yellow());
                return Ok(());
            }
        }
    }
}

/// Print one lifecycle transition
fn print_event(event: &LifecycleEvent) {
    let at = event.at.format("%H:%M:%S").to_string();

    match &event.state {
        LifecycleState::Idle => println!("{} {}", at.dimmed(), "Idle".dimmed()),
        LifecycleState::Submitting => {
            println!("{} {}", at.dimmed(), "Submitting job...".yellow())
        }
        LifecycleState::Polling { task_id } => println!(
            "{} {} (task {})",
            at.dimmed(),
            "Waiting for the service...".cyan(),
            task_id.dimmed()
        ),
        LifecycleState::Succeeded { .. } => println!("{} {}", at.dimmed(), "✓ Done".green()),
        LifecycleState::Failed { reason } => {
            println!("{} {} {}", at.dimmed(), "✗ Failed:".red(), reason)
        }
    }
}

/// Report the settled state; failure becomes a non-zero exit
fn finish(state: LifecycleState) -> Result<()> {
    match state {
        LifecycleState::Succeeded { result: Some(result) } => {
            println!();
            println!("{}", "Result:".bold());
            println!("  {}", result.result_url.green());
            Ok(())
        }
        LifecycleState::Succeeded { result: None } => {
            println!("{}", "The service finished but returned no image.".yellow());
            Ok(())
        }
        LifecycleState::Failed { reason } => Err(anyhow::anyhow!("Job failed: {}", reason)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("upscale_factor=4").unwrap(),
            ("upscale_factor".to_string(), "4".to_string())
        );
        assert_eq!(
            parse_key_val("prompt=a=b").unwrap(),
            ("prompt".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
    }

    #[test]
    fn test_param_value() {
        assert_eq!(param_value("4"), JsonValue::from(4));
        assert_eq!(param_value("true"), JsonValue::from(true));
        assert_eq!(param_value("sharp"), JsonValue::from("sharp"));
    }

    #[test]
    fn test_finish() {
        assert!(finish(LifecycleState::Succeeded { result: None }).is_ok());
        let err = finish(LifecycleState::Failed {
            reason: retouch_core::domain::lifecycle::FailureReason::RemoteFailed,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Job failed: remote: failed");
    }
}
