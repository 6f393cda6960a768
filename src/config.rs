use clap::Parser;
use std::path::{Path, PathBuf};

/// File name of the bundled demo scan
pub const SAMPLE_IMAGE: &str = "noised.jpg";
const CONTACT_FILE: &str = "contact_submissions.csv";

#[derive(Parser, Debug)]
#[command(name = "living-portfolio-server")]
#[command(about = "Portfolio API with weather theming and a sheet-music cleanup demo")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "PORTFOLIO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORTFOLIO_PORT", default_value = "8000")]
    pub port: u16,

    /// Maximum upload size in bytes (default: 20MB)
    #[arg(long, env = "PORTFOLIO_MAX_FILE_SIZE", default_value = "20971520")]
    pub max_file_size: usize,

    /// Maximum number of pixels accepted by the denoise demo
    #[arg(long, env = "PORTFOLIO_MAX_PIXELS", default_value = "1000000")]
    pub max_pixels: u64,

    /// Number of cleanup pipelines allowed to run at the same time
    #[arg(
        long,
        env = "PORTFOLIO_MAX_CONCURRENT_CLEANUPS",
        default_value = "2",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub max_concurrent_cleanups: u16,

    /// Directory holding uploaded and cleaned images
    #[arg(long, env = "PORTFOLIO_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Directory containing the built frontend
    #[arg(long, env = "PORTFOLIO_FRONTEND_DIR", default_value = "frontend/build")]
    pub frontend_dir: PathBuf,

    /// Directory where contact form submissions are recorded
    #[arg(long, env = "PORTFOLIO_CONTACT_DIR", default_value = "contact_submissions")]
    pub contact_dir: PathBuf,

    /// Forecast endpoint used for weather lookups
    #[arg(
        long,
        env = "PORTFOLIO_WEATHER_URL",
        default_value = "https://api.open-meteo.com/v1/forecast"
    )]
    pub weather_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub max_pixels: u64,
    pub max_concurrent_cleanups: usize,
    pub weather_url: String,
    pub paths: StoragePaths,
}

/// Resolved locations of everything the server reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub uploaded_dir: PathBuf,
    pub cleaned_dir: PathBuf,
    pub frontend_dir: PathBuf,
    pub contact_dir: PathBuf,
}

impl StoragePaths {
    pub fn new(static_dir: &Path, frontend_dir: &Path, contact_dir: &Path) -> Self {
        Self {
            uploaded_dir: static_dir.join("uploaded_images"),
            cleaned_dir: static_dir.join("cleaned_images"),
            frontend_dir: frontend_dir.to_path_buf(),
            contact_dir: contact_dir.to_path_buf(),
        }
    }

    pub fn contact_file(&self) -> PathBuf {
        self.contact_dir.join(CONTACT_FILE)
    }

    pub fn sample_image(&self) -> PathBuf {
        self.uploaded_dir.join(SAMPLE_IMAGE)
    }

    pub fn frontend_index(&self) -> PathBuf {
        self.frontend_dir.join("index.html")
    }
}

impl Config {
    /// Create the directories the server writes into
    pub fn prepare_directories(&self) -> anyhow::Result<()> {
        for dir in [
            &self.paths.uploaded_dir,
            &self.paths.cleaned_dir,
            &self.paths.contact_dir,
        ] {
            std::fs::create_dir_all(dir).map_err(|e| {
                anyhow::anyhow!("Failed to create directory {}: {}", dir.display(), e)
            })?;
        }
        if !self.paths.frontend_dir.is_dir() {
            tracing::warn!(
                "Frontend directory {} not found, only API routes will respond",
                self.paths.frontend_dir.display()
            );
        }
        Ok(())
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_file_size: args.max_file_size,
            max_pixels: args.max_pixels,
            max_concurrent_cleanups: usize::from(args.max_concurrent_cleanups),
            weather_url: args.weather_url,
            paths: StoragePaths::new(&args.static_dir, &args.frontend_dir, &args.contact_dir),
        }
    }
}
