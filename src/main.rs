use clap::Parser;
use color_eyre::eyre::Result;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use imgfailover::application::ImageUrlResolver;
use imgfailover::infrastructure::{AppConfig, CliArgs, Command, ConfigStore, build_resolver};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let store = ConfigStore::new()?;
    let mut config = store.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

async fn run(args: CliArgs, resolver: &ImageUrlResolver) -> Result<()> {
    match args.command {
        Command::Resolve { path, transform } => {
            let options = transform.to_options()?;
            let resolved = resolver.resolve_detailed(&path, &options).await;
            if args.json {
                println!(
                    "{}",
                    json!({ "url": resolved.as_str(), "source": resolved.source() })
                );
            } else {
                println!("{resolved}");
            }
        }
        Command::Srcset {
            path,
            widths,
            sizes,
            transform,
        } => {
            let base = transform.to_options()?;
            if sizes.is_some() || args.json {
                let image = resolver
                    .responsive_image(&path, &widths, sizes.as_deref(), &base)
                    .await;
                println!("{}", serde_json::to_string_pretty(&image)?);
            } else {
                println!("{}", resolver.build_srcset_with(&path, &widths, &base).await);
            }
        }
        Command::Lqip { path, width } => {
            println!("{}", resolver.lqip(&path, width).await);
        }
        Command::Status { refresh } => {
            let tracker = resolver.tracker();
            let available = if refresh {
                tracker.refresh().await
            } else {
                tracker.is_available().await
            };
            let status = tracker.status();
            debug!(available, "Status check complete");

            if args.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                let state = if status.available { "available" } else { "unavailable" };
                println!("primary: {state}");
                if let Some(last_checked) = status.last_checked {
                    println!("last checked: {}", last_checked.to_rfc3339());
                }
                println!("consecutive failures: {}", status.consecutive_failures);
            }
        }
        // Written before the resolver is built.
        Command::InitConfig { .. } => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();

    if let Command::InitConfig { force } = args.command {
        let path = ConfigStore::new()?.init_config(args.config.as_deref(), force)?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = imgfailover::VERSION, "Starting {}", imgfailover::NAME);

    let resolver = build_resolver(&config)?;
    run(args, &resolver).await
}
