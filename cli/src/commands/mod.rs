pub mod auth;
pub mod products;
pub mod profile;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bazaar_client::{ImageUpload, ProductId, ProductSort, ProductStatus};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// Search published listings
    List {
        /// Free-text search over title and description
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        min_price: Option<f64>,

        #[arg(long)]
        max_price: Option<f64>,

        #[arg(short, long)]
        location: Option<String>,

        /// newest, oldest, price_asc or price_desc
        #[arg(long, default_value = "newest")]
        sort: ProductSort,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Show one listing
    Show { id: ProductId },

    /// Create a listing (saved as a draft unless --publish is given)
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        price: f64,

        #[arg(long)]
        category: String,

        #[arg(long)]
        location: Option<String>,

        /// Image files to attach (repeatable)
        #[arg(long = "image")]
        images: Vec<PathBuf>,

        #[arg(long)]
        publish: bool,
    },

    /// Edit a listing you own
    Edit {
        id: ProductId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        location: Option<String>,
    },

    /// Make a listing visible
    Publish { id: ProductId },

    /// Hide a published listing
    Unpublish { id: ProductId },

    /// Mark a listing as sold
    Sold { id: ProductId },

    /// Delete a listing you own
    Delete { id: ProductId },

    /// List your own listings
    Mine {
        /// Only listings with this status
        #[arg(long)]
        status: Option<ProductStatus>,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Change name, email or phone
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Upload a new profile photo
    Avatar { path: PathBuf },
}

/// Resolve a use-case registered under `key`
pub fn use_case<T: Send + Sync + 'static>(
    container: &bazaar_client::Container,
    key: &str,
) -> Result<Arc<T>> {
    container
        .resolve::<T>(key)
        .with_context(|| format!("Failed to initialize {}", key))
}

pub async fn read_image(path: &Path) -> Result<ImageUpload> {
    ImageUpload::from_path(path)
        .await
        .with_context(|| format!("Could not read image {}", path.display()))
}
