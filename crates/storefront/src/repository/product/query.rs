use crate::{
    abstract_trait::product::repository::ProductQueryRepositoryTrait,
    domain::requests::product::FindAllProducts, model::product::Product,
};
use shared::{config::ConnectionPool, errors::RepositoryError};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::FromRow;
use tracing::{error, info};

const PRODUCT_COLUMNS: &str = "product_id, name, image, category, description, price, stock, \
     rating, num_reviews, created_at, updated_at, deleted_at";

#[derive(FromRow)]
struct ProductPageRow {
    product_id: i32,
    name: String,
    image: String,
    category: String,
    description: String,
    price: Decimal,
    stock: i32,
    rating: Decimal,
    num_reviews: i32,
    created_at: Option<NaiveDateTime>,
    updated_at: Option<NaiveDateTime>,
    deleted_at: Option<NaiveDateTime>,
    total_count: i64,
}

impl From<ProductPageRow> for Product {
    fn from(r: ProductPageRow) -> Self {
        Product {
            product_id: r.product_id,
            name: r.name,
            image: r.image,
            category: r.category,
            description: r.description,
            price: r.price,
            stock: r.stock,
            rating: r.rating,
            num_reviews: r.num_reviews,
            created_at: r.created_at,
            updated_at: r.updated_at,
            deleted_at: r.deleted_at,
        }
    }
}

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        info!("📦 Fetching products with search {:?}", req.search);

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let limit = req.page_size as i64;
        let offset = ((req.page - 1).max(0) * req.page_size) as i64;

        let search_pattern = req
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let rows: Vec<ProductPageRow> = sqlx::query_as(
            r#"
        SELECT product_id, name, image, category, description, price, stock,
               rating, num_reviews, created_at, updated_at, deleted_at,
               COUNT(*) OVER() AS total_count
        FROM products
        WHERE deleted_at IS NULL
          AND ($1::TEXT IS NULL
               OR name ILIKE '%' || $1 || '%'
               OR category ILIKE '%' || $1 || '%')
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
        )
        .bind(search_pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch products: {:?}", e);
            RepositoryError::from(e)
        })?;

        let total = rows.first().map(|r| r.total_count).unwrap_or(0);
        let products = rows.into_iter().map(Product::from).collect();

        Ok((products, total))
    }

    async fn find_by_id(&self, product_id: i32) -> Result<Option<Product>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let product: Option<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1 AND deleted_at IS NULL"
        ))
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch product {}: {:?}", product_id, e);
            RepositoryError::from(e)
        })?;

        Ok(product)
    }

    async fn find_by_ids(&self, product_ids: &[i32]) -> Result<Vec<Product>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let products: Vec<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = ANY($1) AND deleted_at IS NULL"
        ))
        .bind(product_ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch catalog snapshot: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(products)
    }

    async fn find_top_rated(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let products: Vec<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE deleted_at IS NULL
             ORDER BY rating DESC, num_reviews DESC
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch top rated products: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(products)
    }
}
