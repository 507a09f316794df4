pub mod lookup;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use crate::embedly::config::{DEFAULT_API_URL, DEFAULT_DISPLAY_URL};
use crate::embedly::{EmbedlyApi, EmbedlyConfig};

/// Embedly command line client
#[derive(Parser, Debug)]
#[command(name = "embedly-cli")]
#[command(version)]
#[command(about = "Query the Embedly embed, extract and display APIs", long_about = None)]
pub struct Cli {
    /// Embedly API key
    #[arg(long, env = "EMBEDLY_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Metadata API base URL
    #[arg(long, env = "EMBEDLY_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Display API base URL
    #[arg(long, env = "EMBEDLY_DISPLAY_URL", default_value = DEFAULT_DISPLAY_URL, global = true)]
    pub display_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch oEmbed data for one or more URLs
    Embed(lookup::LookupArgs),

    /// Extract article data for one or more URLs
    Extract(lookup::LookupArgs),

    /// Crop an image to an exact size
    Crop(lookup::CropArgs),

    /// Resize an image to a width
    Resize(lookup::ResizeArgs),

    /// Print the request URL without sending it
    Url(lookup::UrlArgs),
}

impl Cli {
    /// Client configuration from the global flags and environment
    pub fn config(&self) -> Result<EmbedlyConfig> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("API key required. Use --api-key or set EMBEDLY_API_KEY"))?;

        let mut config = EmbedlyConfig::from_env();
        config.api_key = api_key;
        config.api_url = self.api_url.clone();
        config.display_url = self.display_url.clone();

        config.validate().map_err(|e| anyhow!(e))?;
        Ok(config)
    }
}

/// Execute CLI command, returning the text to print
pub async fn execute(command: Commands, api: &dyn EmbedlyApi) -> Result<String> {
    match command {
        Commands::Embed(args) => lookup::embed(args, api).await,
        Commands::Extract(args) => lookup::extract(args, api).await,
        Commands::Crop(args) => lookup::crop(args, api).await,
        Commands::Resize(args) => lookup::resize(args, api).await,
        Commands::Url(args) => lookup::request_url(args, api),
    }
}
