use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use rendr::RenderInput;

#[derive(Parser)]
#[command(name = "rendr", version, about = "rendr Cloud Run render CLI")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// JSON config file providing `region` and/or `state_file`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Cloud Run region (overrides config file and RENDR_GCP_REGION)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Local cloud state file (overrides config file and RENDR_STATE_FILE)
    #[arg(long, global = true)]
    pub state_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a video on Cloud Run
    Render(RenderArgs),
    /// Render a still frame on Cloud Run
    Still(RenderArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Render(_) => "render",
            Command::Still(_) => "still",
        }
    }

    pub fn args(&self) -> &RenderArgs {
        match self {
            Command::Render(args) | Command::Still(args) => args,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// <serve-url-or-site-name> [composition-id] [output-location]
    #[arg(value_name = "ARGS", num_args = 0..=3)]
    pub positional: Vec<String>,

    /// Name of the output file in the bucket
    #[arg(long)]
    pub out_name: Option<String>,

    /// Output privacy (public or private)
    #[arg(long)]
    pub privacy: Option<String>,

    /// Bucket receiving the output (defaults to the project bucket)
    #[arg(long)]
    pub output_bucket: Option<String>,

    /// Send the render to this Cloud Run URL
    #[arg(long)]
    pub cloud_run_url: Option<String>,

    /// Send the render to this Cloud Run service
    #[arg(long)]
    pub service_name: Option<String>,

    /// Print the resolved request as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl RenderArgs {
    pub fn to_input(&self) -> RenderInput {
        RenderInput {
            positional: self.positional.clone(),
            out_name: self.out_name.clone(),
            privacy: self.privacy.clone(),
            output_bucket: self.output_bucket.clone(),
            cloud_run_url: self.cloud_run_url.clone(),
            service_name: self.service_name.clone(),
        }
    }
}
