//! Seed the menu from a YAML file.
//!
//! The file lists categories (each with its menu items) and printed menu
//! entries. Rows that already exist are left alone: categories are matched
//! by slug, menu items by title and menus by name.
//!
//! ```yaml
//! categories:
//!   - slug: mains
//!     title: Mains
//!     items:
//!       - title: Grilled Fish
//!         price: "20.00"
//!         featured: true
//! menus:
//!   - name: Grilled Fish
//!     price: "20.00"
//!     description: Fresh catch of the day.
//! ```

use std::path::Path;

use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

use little_lemon_core::{Price, PriceError, Slug, SlugError};
use little_lemon_restaurant::db::{
    self, CategoryRepository, MenuItemRepository, MenuRepository, RepositoryError,
};
use little_lemon_restaurant::models::{NewCategory, NewMenu, NewMenuItem};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The file could not be read.
    #[error("Cannot read {0}: {1}")]
    Io(String, std::io::Error),

    /// The file is not valid seed YAML.
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A category slug is malformed.
    #[error("Invalid slug {0:?}: {1}")]
    Slug(String, SlugError),

    /// A price is malformed.
    #[error("Invalid price for {0:?}: {1}")]
    Price(String, PriceError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    /// Migrations failed.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A read or write failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Top-level seed file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedFile {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub menus: Vec<SeedMenu>,
}

/// A category and the items listed under it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedCategory {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<SeedMenuItem>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedMenuItem {
    pub title: String,
    pub price: String,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedMenu {
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub description: String,
}

/// Counts of rows written and rows already present.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

impl SeedSummary {
    const fn record(&mut self, inserted: bool) {
        if inserted {
            self.inserted += 1;
        } else {
            self.skipped += 1;
        }
    }
}

/// Seed the menu from `file_path`.
///
/// Applies migrations first so a fresh database can be seeded directly.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a slug or price is
/// invalid, or a database operation fails.
pub async fn menu(file_path: &str) -> Result<(), SeedError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading menu from file");

    // Parse before touching the database
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SeedError::Io(file_path.to_string(), e))?;
    let seed = parse(&content)?;

    info!(
        categories = seed.categories.len(),
        menus = seed.menus.len(),
        "Parsed seed file"
    );

    let pool = super::connect().await?;
    db::run_migrations(&pool).await?;

    let summary = apply(&pool, &seed).await?;

    info!("Seeding complete!");
    info!("  Rows inserted: {}", summary.inserted);
    info!("  Rows skipped (already exist): {}", summary.skipped);
    Ok(())
}

/// Parse seed YAML and check every slug and price.
///
/// # Errors
///
/// Returns `SeedError::Yaml` for malformed YAML, or `SeedError::Slug` /
/// `SeedError::Price` for the first invalid value.
pub fn parse(content: &str) -> Result<SeedFile, SeedError> {
    let seed: SeedFile = serde_yaml::from_str(content)?;

    for category in &seed.categories {
        parse_slug(&category.slug)?;
        for item in &category.items {
            parse_price(&item.title, &item.price)?;
        }
    }
    for menu in &seed.menus {
        parse_price(&menu.name, &menu.price)?;
    }

    Ok(seed)
}

/// Write everything in `seed` that is not already in the database.
///
/// # Errors
///
/// Returns `SeedError` if a value is invalid or a database operation fails.
pub async fn apply(pool: &SqlitePool, seed: &SeedFile) -> Result<SeedSummary, SeedError> {
    let categories = CategoryRepository::new(pool);
    let items = MenuItemRepository::new(pool);
    let menus = MenuRepository::new(pool);
    let mut summary = SeedSummary::default();

    for entry in &seed.categories {
        let slug = parse_slug(&entry.slug)?;
        let category = if let Some(existing) = categories.get_by_slug(&slug).await? {
            summary.record(false);
            existing
        } else {
            summary.record(true);
            categories
                .create(&NewCategory {
                    slug,
                    title: entry.title.trim().to_string(),
                })
                .await?
        };
        debug!(category = %category, "Category ready");

        for item in &entry.items {
            let title = item.title.trim();
            if items.get_by_title(title).await?.is_some() {
                summary.record(false);
                continue;
            }
            items
                .create(&NewMenuItem {
                    title: title.to_string(),
                    price: parse_price(&item.title, &item.price)?,
                    featured: item.featured,
                    category_id: category.id,
                })
                .await?;
            summary.record(true);
        }
    }

    for entry in &seed.menus {
        let name = entry.name.trim();
        if menus.get_by_name(name).await?.is_some() {
            summary.record(false);
            continue;
        }
        menus
            .create(&NewMenu {
                name: name.to_string(),
                price: parse_price(&entry.name, &entry.price)?,
                menu_item_description: entry.description.trim().to_string(),
            })
            .await?;
        summary.record(true);
    }

    Ok(summary)
}

fn parse_slug(raw: &str) -> Result<Slug, SeedError> {
    Slug::parse(raw.trim()).map_err(|e| SeedError::Slug(raw.to_string(), e))
}

fn parse_price(owner: &str, raw: &str) -> Result<Price, SeedError> {
    Price::parse(raw.trim()).map_err(|e| SeedError::Price(owner.to_string(), e))
}
