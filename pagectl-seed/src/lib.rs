//! Synthetic data seeder for the products store behind the pagination API
//!
//! Wipes `users`, `categories`, `products` and `product_categories`, then
//! refills them with fake rows in a single transaction.

pub mod generate;
pub mod seeder;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::ProgressBar;
use pagectl_core::config::{DatabaseConfig, PagectlConfig, SeedConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;
use tracing::{info, instrument};

pub use seeder::{SeedProgress, SeedSummary, Seeder, TableCounts};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid seed plan: {reason}")]
    InvalidPlan { reason: String },

    #[error("no users to own products")]
    NoOwners,
}

impl SeedError {
    pub fn invalid_plan(reason: impl Into<String>) -> Self {
        SeedError::InvalidPlan {
            reason: reason.into(),
        }
    }
}

/// How many rows of each kind a seed inserts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlan {
    pub users: usize,
    pub products: usize,
    pub categories_per_product: usize,
}

impl Default for SeedPlan {
    fn default() -> Self {
        SeedConfig::default().into()
    }
}

impl From<SeedConfig> for SeedPlan {
    fn from(config: SeedConfig) -> Self {
        Self {
            users: config.users,
            products: config.products,
            categories_per_product: config.categories_per_product,
        }
    }
}

impl SeedPlan {
    pub fn validate(&self) -> Result<(), SeedError> {
        let available = generate::CATEGORY_NAMES.len();
        if self.categories_per_product > available {
            return Err(SeedError::invalid_plan(format!(
                "categories_per_product is {} but only {available} categories exist",
                self.categories_per_product
            )));
        }
        if self.products > 0 && self.users == 0 {
            return Err(SeedError::invalid_plan(
                "products need at least one user to own them",
            ));
        }
        Ok(())
    }
}

/// Connection options from `database.url` if set, else the individual fields
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions> {
    match config.url.as_deref() {
        Some(url) => url
            .parse::<PgConnectOptions>()
            .context("Invalid database URL"),
        None => Ok(PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)),
    }
}

#[derive(Args, Debug, Default)]
pub struct SeedArgs {
    /// PostgreSQL connection URL (overrides the [database] config section)
    #[arg(long, value_name = "URL")]
    pub database_url: Option<String>,

    /// Number of users to create
    #[arg(long)]
    pub users: Option<usize>,

    /// Number of products to create
    #[arg(long)]
    pub products: Option<usize>,

    /// Distinct categories linked to each product
    #[arg(long)]
    pub categories_per_product: Option<usize>,

    /// RNG seed for a reproducible dataset
    #[arg(long, value_name = "U64")]
    pub seed: Option<u64>,

    /// Generate the data and print a summary without touching the database
    #[arg(long)]
    pub dry_run: bool,

    /// Count rows in every table after committing
    #[arg(long)]
    pub verify: bool,
}

impl SeedArgs {
    /// Config values with command-line flags applied on top
    pub fn plan(&self, config: &SeedConfig) -> SeedPlan {
        SeedPlan {
            users: self.users.unwrap_or(config.users),
            products: self.products.unwrap_or(config.products),
            categories_per_product: self
                .categories_per_product
                .unwrap_or(config.categories_per_product),
        }
    }

    fn database(&self, config: &DatabaseConfig) -> DatabaseConfig {
        let mut database = config.clone();
        if let Some(url) = &self.database_url {
            database.url = Some(url.clone());
        }
        database
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// `pagectl seed`
///
/// `progress` is advanced once per product; pass a hidden bar to stay quiet.
#[instrument(skip_all, fields(dry_run = args.dry_run))]
pub async fn run_seed(args: SeedArgs, config: &PagectlConfig, progress: &ProgressBar) -> Result<()> {
    let plan = args.plan(&config.seed);
    plan.validate()?;
    let mut rng = args.rng();
    let now = chrono::Local::now().naive_local();

    if args.dry_run {
        return dry_run(&plan, &mut rng, now, progress);
    }

    let options = connect_options(&args.database(&config.database))?;
    let seeder = Seeder::connect(options)
        .await
        .context("Failed to connect to PostgreSQL")?;

    progress.set_length(plan.products as u64);
    let summary = seeder
        .seed(&plan, &mut rng, now, |stage| {
            let line = match stage {
                SeedProgress::Truncated => {
                    format!("🧹 Tables cleared (TRUNCATE)\n👤 Creating {} users...", plan.users)
                }
                SeedProgress::Users(_) => format!(
                    "🏷️ Creating {} categories...",
                    generate::CATEGORY_NAMES.len()
                ),
                SeedProgress::Categories(_) => {
                    format!("📦 Generating {} products...", plan.products)
                }
                SeedProgress::Product(done) => {
                    progress.set_position(done as u64);
                    return;
                }
                SeedProgress::Committed => {
                    progress.finish_and_clear();
                    return;
                }
            };
            progress.suspend(|| println!("{line}"));
        })
        .await
        .context("Seeding failed, nothing was committed")?;

    println!("✅ Bulk load completed successfully!");
    println!(
        "   {} users, {} categories, {} products, {} category links in {:.1}s",
        summary.users,
        summary.categories,
        summary.products,
        summary.links,
        summary.elapsed.as_secs_f64()
    );

    if args.verify {
        let counts = seeder.counts().await.context("Failed to count seeded rows")?;
        report_counts(&counts, &TableCounts::expected(&plan));
    }

    Ok(())
}

fn dry_run(
    plan: &SeedPlan,
    rng: &mut StdRng,
    now: chrono::NaiveDateTime,
    progress: &ProgressBar,
) -> Result<()> {
    // Placeholder ids stand in for the ones the database would return
    let owners: Vec<i64> = (1..=plan.users as i64).collect();
    let categories = generate::categories(rng);
    let category_ids: Vec<i64> = (1..=categories.len() as i64).collect();

    progress.set_length(plan.products as u64);
    let mut products = Vec::with_capacity(plan.products);
    for _ in 0..plan.products {
        products.push(generate::fake_product(
            rng,
            &owners,
            &category_ids,
            plan.categories_per_product,
            now,
        )?);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let links: usize = products.iter().map(|p| p.category_ids.len()).sum();
    info!(products = products.len(), links, "dry run generated");

    println!("🔎 Dry run: nothing was written");
    println!(
        "   would insert {} users, {} categories, {} products, {} category links",
        plan.users,
        categories.len(),
        products.len(),
        links
    );
    for product in products.iter().take(3) {
        println!(
            "   e.g. {} | ${:.2} | owner {} | categories {:?}",
            product.name, product.price, product.user_id, product.category_ids
        );
    }
    Ok(())
}

fn report_counts(actual: &TableCounts, expected: &TableCounts) {
    let rows = [
        ("users", actual.users, expected.users),
        ("categories", actual.categories, expected.categories),
        ("products", actual.products, expected.products),
        (
            "product_categories",
            actual.product_categories,
            expected.product_categories,
        ),
    ];
    for (table, got, want) in rows {
        let mark = if got == want { "✅" } else { "❌" };
        println!("{mark} {table}: {got} rows (expected {want})");
    }
}
