//! Seeding against a real PostgreSQL
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p pagectl-seed -- --ignored

use chrono::Local;
use pagectl_seed::{SeedPlan, SeedProgress, Seeder, TableCounts};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::PgPool;

#[sqlx::test(migrations = false, fixtures("schema"))]
#[ignore = "requires database"]
async fn default_plan_fills_all_tables(pool: PgPool) -> sqlx::Result<()> {
    let seeder = Seeder::from_pool(pool.clone());
    let plan = SeedPlan::default();
    let mut stages = Vec::new();

    let summary = seeder
        .seed(
            &plan,
            &mut StdRng::seed_from_u64(2024),
            Local::now().naive_local(),
            |stage| {
                if !matches!(stage, SeedProgress::Product(_)) {
                    stages.push(stage);
                }
            },
        )
        .await
        .expect("seed");

    assert_eq!(summary.products, 1000);
    assert_eq!(summary.links, 2000);
    assert_eq!(
        stages,
        vec![
            SeedProgress::Truncated,
            SeedProgress::Users(5),
            SeedProgress::Categories(10),
            SeedProgress::Committed,
        ]
    );

    let counts = seeder.counts().await.expect("counts");
    assert_eq!(counts, TableCounts::expected(&plan));
    assert_eq!(counts.users, 5);
    assert_eq!(counts.categories, 10);
    assert_eq!(counts.products, 1000);
    assert_eq!(counts.product_categories, 2000);

    let distinct_pairs: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM (SELECT DISTINCT product_id, category_id FROM product_categories) t",
    )
    .fetch_one(&pool)
    .await?;
    assert_eq!(distinct_pairs, 2000);

    let out_of_range: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE price < 10 OR price > 5000")
            .fetch_one(&pool)
            .await?;
    assert_eq!(out_of_range, 0);

    Ok(())
}

#[sqlx::test(migrations = false, fixtures("schema"))]
#[ignore = "requires database"]
async fn reseeding_restarts_identities(pool: PgPool) -> sqlx::Result<()> {
    let seeder = Seeder::from_pool(pool.clone());
    let plan = SeedPlan {
        users: 2,
        products: 20,
        categories_per_product: 2,
    };
    let now = Local::now().naive_local();

    for seed in [1, 2] {
        seeder
            .seed(&plan, &mut StdRng::seed_from_u64(seed), now, |_| {})
            .await
            .expect("seed");
    }

    let counts = seeder.counts().await.expect("counts");
    assert_eq!(counts, TableCounts::expected(&plan));

    let first_user: i64 = sqlx::query_scalar("SELECT MIN(id) FROM users")
        .fetch_one(&pool)
        .await?;
    assert_eq!(first_user, 1);

    Ok(())
}
