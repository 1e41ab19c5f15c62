use tracing::{debug, info};

use rendr::config::ConfigLayer;
use rendr::logging::init_logging;
use rendr::{CloudConfig, ResolvedRenderArgs, TargetService, TerminalPicker, resolve_render_args};

use super::args::CliArgs;
use super::errors::AppError;

fn load_config(args: &CliArgs) -> Result<CloudConfig, AppError> {
    let flags = ConfigLayer {
        region: args.region.clone(),
        state_file: args.state_file.clone(),
    };

    let file = match &args.config {
        Some(path) if !path.exists() => {
            return Err(AppError::ConfigNotFound { path: path.clone() });
        }
        Some(path) => ConfigLayer::from_file(path)?,
        None => ConfigLayer::default(),
    };

    Ok(CloudConfig::resolve([flags, file, ConfigLayer::from_env()])?)
}

fn print_summary(subcommand: &str, resolved: &ResolvedRenderArgs) {
    println!("Render type:    {subcommand}");
    println!("Serve URL:      {}", resolved.serve_url);
    println!("Composition:    {}", resolved.composition_id);
    match &resolved.target_service {
        TargetService::Url { cloud_run_url } => {
            println!("Cloud Run URL:  {cloud_run_url}");
        }
        TargetService::Named {
            service_name,
            cloud_run_url,
        } => {
            println!("Service:        {service_name}");
            println!("Cloud Run URL:  {cloud_run_url}");
        }
    }
    println!("Output bucket:  {}", resolved.output_bucket);
    println!("Privacy:        {}", resolved.privacy);
    if let Some(out_name) = &resolved.out_name {
        println!("Output name:    {out_name}");
    }
    if let Some(download_name) = &resolved.download_name {
        println!("Download to:    {download_name}");
    }
}

pub fn run(args: CliArgs) -> Result<(), AppError> {
    init_logging(args.log);

    let config = load_config(&args)?;
    let subcommand = args.command.name();
    let render = args.command.args();
    debug!("Running {} with {:?}", subcommand, render);

    let picker = TerminalPicker::stdio();
    let resolved = resolve_render_args(&config, subcommand, &render.to_input(), &picker)?;

    if render.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        print_summary(subcommand, &resolved);
    }
    info!("Render request for {} ready", resolved.composition_id);
    Ok(())
}
