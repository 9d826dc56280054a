use super::app_config::LogLevel;
use crate::domain::entities::{AspectRatio, CropMode, FocusPoint, ImageFormat, TransformOptions};
use crate::domain::errors::TransformError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "imgfailover",
    version,
    about = "Resolve image URLs against a CDN with failover to pre-signed storage URLs",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Print machine readable JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Primary CDN base URL.
    #[arg(long, env = "IMGFAILOVER_PRIMARY_BASE_URL", global = true)]
    pub primary_base_url: Option<String>,

    /// Backup storage endpoint.
    #[arg(long, env = "IMGFAILOVER_BACKUP_ENDPOINT", global = true)]
    pub backup_endpoint: Option<String>,

    /// Backup storage bucket.
    #[arg(long, env = "IMGFAILOVER_BACKUP_BUCKET", global = true)]
    pub backup_bucket: Option<String>,

    /// Backup storage access key id.
    #[arg(long, env = "IMGFAILOVER_BACKUP_ACCESS_KEY_ID", hide_env_values = true, global = true)]
    pub backup_access_key_id: Option<String>,

    /// Backup storage secret access key.
    #[arg(long, env = "IMGFAILOVER_BACKUP_SECRET_ACCESS_KEY", hide_env_values = true, global = true)]
    pub backup_secret_access_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve one image URL.
    Resolve {
        /// Image path or URL.
        path: String,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Build a srcset value.
    Srcset {
        /// Image path or URL.
        path: String,

        /// Comma separated widths, e.g. 400,800,1200.
        #[arg(long, value_delimiter = ',', required = true)]
        widths: Vec<u32>,

        /// Optional `sizes` attribute; prints the full attribute bundle.
        #[arg(long)]
        sizes: Option<String>,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Resolve a blurred placeholder URL.
    Lqip {
        /// Image path or URL.
        path: String,

        /// Placeholder width.
        #[arg(long)]
        width: Option<u32>,
    },

    /// Report primary provider availability.
    Status {
        /// Probe now instead of trusting the interval.
        #[arg(long)]
        refresh: bool,
    },

    /// Write a default configuration file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Default, Clone, Args)]
pub struct TransformArgs {
    /// Target width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Quality, 1-100.
    #[arg(long)]
    pub quality: Option<u32>,

    /// Output format (auto, webp, avif, jpg, png).
    #[arg(long)]
    pub format: Option<ImageFormat>,

    /// Blur radius.
    #[arg(long)]
    pub blur: Option<u32>,

    /// Aspect ratio as W:H.
    #[arg(long)]
    pub aspect_ratio: Option<AspectRatio>,

    /// Crop mode (maintain_ratio, force, at_least, at_max).
    #[arg(long)]
    pub crop: Option<CropMode>,

    /// Focus anchor (center, top, top_left, ...).
    #[arg(long)]
    pub focus: Option<FocusPoint>,
}

impl TransformArgs {
    /// Builds validated transform options.
    ///
    /// # Errors
    /// Returns error if a value is out of range.
    pub fn to_options(&self) -> Result<TransformOptions, TransformError> {
        let mut builder = TransformOptions::builder();

        if let Some(width) = self.width {
            builder = builder.width(width);
        }
        if let Some(height) = self.height {
            builder = builder.height(height);
        }
        if let Some(quality) = self.quality {
            builder = builder.quality(quality);
        }
        if let Some(format) = self.format {
            builder = builder.format(format);
        }
        if let Some(blur) = self.blur {
            builder = builder.blur(blur);
        }
        if let Some(ratio) = self.aspect_ratio {
            builder = builder.aspect_ratio(ratio);
        }
        if let Some(crop) = self.crop {
            builder = builder.crop(crop);
        }
        if let Some(focus) = self.focus {
            builder = builder.focus(focus);
        }

        builder.build()
    }
}
