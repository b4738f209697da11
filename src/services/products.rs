// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use anyhow::Result;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::Product;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PriceStats {
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub total_products: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct StockStats {
    pub total: i64,
    pub in_stock: i64,
    pub out_of_stock: i64,
}

/// Payload for the product dashboard: all products plus aggregate stats.
#[derive(Debug, Serialize)]
pub struct ProductsWithStats {
    pub products: Vec<Product>,
    pub categories: Vec<CategoryCount>,
    pub stats: PriceStats,
    pub stock: StockStats,
}

pub async fn get_products_with_stats(pool: &SqlitePool) -> Result<ProductsWithStats> {
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    let categories = sqlx::query_as::<_, CategoryCount>(
        r#"
        SELECT category, COUNT(id) AS count
        FROM products
        WHERE category IS NOT NULL
        GROUP BY category
        ORDER BY category
        "#,
    )
    .fetch_all(pool)
    .await?;

    // COALESCE keeps the aggregates well-typed when the table is empty
    let stats = sqlx::query_as::<_, PriceStats>(
        r#"
        SELECT
            COALESCE(AVG(price), 0.0) AS avg_price,
            COALESCE(MIN(price), 0.0) AS min_price,
            COALESCE(MAX(price), 0.0) AS max_price,
            COUNT(id) AS total_products
        FROM products
        "#,
    )
    .fetch_one(pool)
    .await?;

    let stock = sqlx::query_as::<_, StockStats>(
        r#"
        SELECT
            COUNT(id) AS total,
            COALESCE(SUM(CASE WHEN in_stock THEN 1 ELSE 0 END), 0) AS in_stock,
            COALESCE(SUM(CASE WHEN in_stock THEN 0 ELSE 1 END), 0) AS out_of_stock
        FROM products
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(ProductsWithStats {
        products,
        categories,
        stats,
        stock,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_db_pool;
    use crate::seed::add_sample_products;

    async fn test_pool() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("test.db").display());
        let pool = create_db_pool(&url).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn test_stats_on_empty_table() {
        let (_dir, pool) = test_pool().await;

        let data = get_products_with_stats(&pool).await.unwrap();
        assert!(data.products.is_empty());
        assert!(data.categories.is_empty());
        assert_eq!(data.stats.total_products, 0);
        assert_eq!(data.stats.avg_price, 0.0);
        assert_eq!(data.stock.total, 0);
        assert_eq!(data.stock.in_stock, 0);
        assert_eq!(data.stock.out_of_stock, 0);
    }

    #[tokio::test]
    async fn test_stats_with_sample_products() {
        let (_dir, pool) = test_pool().await;
        let added = add_sample_products(&pool).await.unwrap();

        let data = get_products_with_stats(&pool).await.unwrap();
        assert_eq!(data.products.len(), added);
        assert_eq!(data.stats.total_products, added as i64);
        assert_eq!(data.stock.total, added as i64);
        assert_eq!(
            data.stock.in_stock + data.stock.out_of_stock,
            data.stock.total
        );
        assert!(data.stats.min_price <= data.stats.avg_price);
        assert!(data.stats.avg_price <= data.stats.max_price);

        // Category counts add up to the number of categorized products
        let categorized: i64 = data.categories.iter().map(|c| c.count).sum();
        let with_category = data.products.iter().filter(|p| p.category.is_some()).count();
        assert_eq!(categorized, with_category as i64);
    }
}
