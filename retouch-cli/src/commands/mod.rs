//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod functions;
mod process;
mod status;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run an image through an editing function and wait for the result
    Process {
        /// URL of the source image
        image_url: String,

        /// Function identifier (see `retouch functions`)
        #[arg(short, long, default_value = "remove_watermark")]
        function: String,

        /// Prompt override; the function's default prompt otherwise
        #[arg(short, long)]
        prompt: Option<String>,

        /// Extra parameters as key=value pairs (e.g., upscale_factor=4)
        #[arg(long, value_parser = process::parse_key_val)]
        param: Vec<(String, String)>,
    },
    /// Remove text and watermarks from an image
    RemoveWatermark {
        /// URL of the source image
        image_url: String,
    },
    /// Look up the status of a submitted task once
    Status {
        /// Task ID returned at submission
        task_id: String,
    },
    /// List the available editing functions
    Functions,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Process {
            image_url,
            function,
            prompt,
            param,
        } => process::run_job(config, image_url, &function, prompt, param).await,
        Commands::RemoveWatermark { image_url } => {
            process::run_job(config, image_url, "remove_watermark", None, Vec::new()).await
        }
        Commands::Status { task_id } => status::show_status(config, &task_id).await,
        Commands::Functions => {
            functions::list_functions(config);
            Ok(())
        }
    }
}
