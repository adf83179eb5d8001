//! One-shot task status lookup

use anyhow::{Context, Result};
use colored::*;
use retouch_core::domain::job::JobStatus;

use crate::config::Config;

/// Poll a task once and print what the service reports
pub async fn show_status(config: &Config, task_id: &str) -> Result<()> {
    let api_key = config.api_key();
    if api_key.is_blank() {
        anyhow::bail!("An API key is required (--api-key or DASHSCOPE_API_KEY)");
    }

    let client = config.client()?;
    let report = client
        .poll(task_id, &api_key)
        .await
        .with_context(|| format!("Failed to look up task {}", task_id))?;

    println!("{}", "Task Details:".bold());
    println!("  ID:      {}", task_id.cyan());
    println!("  Status:  {}", colorize_status(&report.status));
    if let Some(raw) = report.raw_status.as_deref() {
        if report.status == JobStatus::Unknown {
            println!("  Code:    {}", raw.dimmed());
        }
    }
    if let Some(result) = &report.result {
        println!("  Result:  {}", result.result_url.green());
    } else if report.status == JobStatus::Succeeded {
        println!("  Result:  {}", "none returned".yellow());
    }

    Ok(())
}

/// Colorize job status for display
fn colorize_status(status: &JobStatus) -> ColoredString {
    let status_str = format!("{:?}", status);
    match status {
        JobStatus::Pending => status_str.yellow(),
        JobStatus::Running => status_str.cyan(),
        JobStatus::Succeeded => status_str.green(),
        JobStatus::Failed => status_str.red(),
        JobStatus::Canceled => status_str.dimmed(),
        JobStatus::Unknown => status_str.dimmed(),
    }
}
