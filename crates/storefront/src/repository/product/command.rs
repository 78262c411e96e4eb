use crate::{
    abstract_trait::product::repository::ProductCommandRepositoryTrait,
    domain::requests::product::{CreateProductRequest, UpdateProductRequest},
    model::product::Product,
};
use shared::{config::ConnectionPool, errors::RepositoryError};

use async_trait::async_trait;
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(&self, req: &CreateProductRequest) -> Result<Product, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let product: Product = sqlx::query_as(
            r#"
        INSERT INTO products (name, image, category, description, price, stock,
                              rating, num_reviews, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, 0, 0, current_timestamp, current_timestamp)
        RETURNING product_id, name, image, category, description, price, stock,
                  rating, num_reviews, created_at, updated_at, deleted_at
        "#,
        )
        .bind(&req.name)
        .bind(&req.image)
        .bind(&req.category)
        .bind(&req.description)
        .bind(req.price)
        .bind(req.stock)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to create product '{}': {:?}", req.name, err);
            RepositoryError::from(err)
        })?;

        info!(
            "✅ Created product ID {} ('{}')",
            product.product_id, product.name
        );
        Ok(product)
    }

    async fn update_product(&self, req: &UpdateProductRequest) -> Result<Product, RepositoryError> {
        let product_id = req
            .product_id
            .ok_or_else(|| RepositoryError::Custom("Missing product id".into()))?;

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let product: Option<Product> = sqlx::query_as(
            r#"
        UPDATE products
        SET name        = $2,
            image       = $3,
            category    = $4,
            description = $5,
            price       = $6,
            stock       = $7,
            updated_at  = current_timestamp
        WHERE product_id = $1 AND deleted_at IS NULL
        RETURNING product_id, name, image, category, description, price, stock,
                  rating, num_reviews, created_at, updated_at, deleted_at
        "#,
        )
        .bind(product_id)
        .bind(&req.name)
        .bind(&req.image)
        .bind(&req.category)
        .bind(&req.description)
        .bind(req.price)
        .bind(req.stock)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to update product ID {}: {:?}", product_id, err);
            RepositoryError::from(err)
        })?;

        let product = product.ok_or(RepositoryError::NotFound)?;

        info!("🔄 Updated product ID {}", product.product_id);
        Ok(product)
    }

    async fn trash_product(&self, product_id: i32) -> Result<Product, RepositoryError> {
        info!("🗑️ Trashing product: {}", product_id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let product: Option<Product> = sqlx::query_as(
            r#"
            UPDATE products
            SET deleted_at = current_timestamp
            WHERE product_id = $1 AND deleted_at IS NULL
            RETURNING product_id, name, image, category, description, price, stock,
                      rating, num_reviews, created_at, updated_at, deleted_at
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to trash product {}: {:?}", product_id, e);
            RepositoryError::from(e)
        })?;

        product.ok_or(RepositoryError::NotFound)
    }
}
