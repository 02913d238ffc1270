//! Transactional seeding of the products store
//!
//! One connection, one transaction, one commit at the end. Any error drops
//! the transaction, which rolls it back.

use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use rand::Rng;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, instrument};

use crate::generate::{self, NewCategory, NewProduct, NewUser};
use crate::{SeedError, SeedPlan};

const TRUNCATE_SQL: &str =
    "TRUNCATE TABLE product_categories, products, categories, users RESTART IDENTITY CASCADE";

const INSERT_USER_SQL: &str = "INSERT INTO users (name, email, password, created_at, updated_at, deleted) \
     VALUES ($1, $2, $3, NOW(), NOW(), false) RETURNING id";

const INSERT_CATEGORY_SQL: &str = "INSERT INTO categories (name, description, created_at, updated_at, deleted) \
     VALUES ($1, $2, NOW(), NOW(), false) RETURNING id";

const INSERT_PRODUCT_SQL: &str = "INSERT INTO products (name, description, price, user_id, created_at, updated_at, deleted) \
     VALUES ($1, $2, $3, $4, $5, $6, false) RETURNING id";

const INSERT_LINK_SQL: &str = "INSERT INTO product_categories (product_id, category_id) VALUES ($1, $2)";

/// Stage reached by a running seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedProgress {
    Truncated,
    Users(usize),
    Categories(usize),
    /// Products inserted so far
    Product(usize),
    Committed,
}

/// What a completed seed inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub categories: usize,
    pub products: usize,
    pub links: usize,
    pub elapsed: Duration,
}

/// Row counts of the four seeded tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    pub users: i64,
    pub categories: i64,
    pub products: i64,
    pub product_categories: i64,
}

impl TableCounts {
    /// Counts a fresh seed with `plan` must leave behind
    pub fn expected(plan: &SeedPlan) -> Self {
        Self {
            users: plan.users as i64,
            categories: generate::CATEGORY_NAMES.len() as i64,
            products: plan.products as i64,
            product_categories: (plan.products * plan.categories_per_product) as i64,
        }
    }
}

pub struct Seeder {
    pool: PgPool,
}

impl Seeder {
    /// Open a single-connection pool
    pub async fn connect(options: PgConnectOptions) -> Result<Self, SeedError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Truncate and repopulate all four tables in one transaction
    #[instrument(skip_all, fields(users = plan.users, products = plan.products))]
    pub async fn seed<R: Rng + Send>(
        &self,
        plan: &SeedPlan,
        rng: &mut R,
        now: NaiveDateTime,
        mut on_progress: impl FnMut(SeedProgress),
    ) -> Result<SeedSummary, SeedError> {
        plan.validate()?;
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(TRUNCATE_SQL).execute(&mut *tx).await?;
        on_progress(SeedProgress::Truncated);

        let mut user_ids = Vec::with_capacity(plan.users);
        for _ in 0..plan.users {
            let user = generate::fake_user(rng);
            user_ids.push(insert_user(&mut tx, &user).await?);
        }
        on_progress(SeedProgress::Users(user_ids.len()));

        let mut category_ids = Vec::with_capacity(generate::CATEGORY_NAMES.len());
        for category in generate::categories(rng) {
            category_ids.push(insert_category(&mut tx, &category).await?);
        }
        on_progress(SeedProgress::Categories(category_ids.len()));

        let mut links = 0;
        for i in 0..plan.products {
            let product = generate::fake_product(
                rng,
                &user_ids,
                &category_ids,
                plan.categories_per_product,
                now,
            )?;
            links += insert_product(&mut tx, &product).await?;
            on_progress(SeedProgress::Product(i + 1));
        }

        tx.commit().await?;
        on_progress(SeedProgress::Committed);

        let summary = SeedSummary {
            users: user_ids.len(),
            categories: category_ids.len(),
            products: plan.products,
            links,
            elapsed: started.elapsed(),
        };
        info!(
            users = summary.users,
            categories = summary.categories,
            products = summary.products,
            links = summary.links,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "seed committed"
        );
        Ok(summary)
    }

    pub async fn counts(&self) -> Result<TableCounts, SeedError> {
        Ok(TableCounts {
            users: count(&self.pool, "users").await?,
            categories: count(&self.pool, "categories").await?,
            products: count(&self.pool, "products").await?,
            product_categories: count(&self.pool, "product_categories").await?,
        })
    }
}

async fn insert_user(tx: &mut Transaction<'_, Postgres>, user: &NewUser) -> Result<i64, SeedError> {
    let id = sqlx::query_scalar::<_, i64>(INSERT_USER_SQL)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.password)
        .fetch_one(&mut **tx)
        .await?;
    debug!(id, email = %user.email, "user");
    Ok(id)
}

async fn insert_category(
    tx: &mut Transaction<'_, Postgres>,
    category: &NewCategory,
) -> Result<i64, SeedError> {
    let id = sqlx::query_scalar::<_, i64>(INSERT_CATEGORY_SQL)
        .bind(category.name)
        .bind(&category.description)
        .fetch_one(&mut **tx)
        .await?;
    debug!(id, name = category.name, "category");
    Ok(id)
}

/// Insert the product and its category links; returns the link count
async fn insert_product(
    tx: &mut Transaction<'_, Postgres>,
    product: &NewProduct,
) -> Result<usize, SeedError> {
    let product_id = sqlx::query_scalar::<_, i64>(INSERT_PRODUCT_SQL)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.user_id)
        .bind(product.created_at)
        .bind(product.created_at)
        .fetch_one(&mut **tx)
        .await?;

    for category_id in &product.category_ids {
        sqlx::query(INSERT_LINK_SQL)
            .bind(product_id)
            .bind(category_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(product.category_ids.len())
}

async fn count(pool: &PgPool, table: &'static str) -> Result<i64, SeedError> {
    // Table names come from a fixed list, never from input
    let sql = format!("SELECT COUNT(*) FROM {table}");
    Ok(sqlx::query_scalar::<_, i64>(&sql).fetch_one(pool).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_counts_for_default_plan() {
        let expected = TableCounts::expected(&SeedPlan::default());
        assert_eq!(
            expected,
            TableCounts {
                users: 5,
                categories: 10,
                products: 1000,
                product_categories: 2000,
            }
        );
    }

    #[test]
    fn truncate_covers_all_tables() {
        for table in ["product_categories", "products", "categories", "users"] {
            assert!(TRUNCATE_SQL.contains(table));
        }
        assert!(TRUNCATE_SQL.ends_with("RESTART IDENTITY CASCADE"));
    }
}
