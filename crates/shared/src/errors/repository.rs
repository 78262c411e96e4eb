use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(#[from] SqlxError),

    #[error("Not found")]
    NotFound,

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Insufficient stock for product {product_id}")]
    StockConflict { product_id: i32 },

    #[error("Serialization conflict: {0}")]
    Serialization(String),

    #[error("Custom: {0}")]
    Custom(String),
}

impl RepositoryError {
    /// Classify a sqlx error by its Postgres error code. Unique violations and
    /// serialization failures carry semantics the service layer acts on; anything
    /// else stays a plain database error.
    pub fn from_pg(err: SqlxError) -> Self {
        if let SqlxError::Database(ref db) = err {
            match db.code().as_deref() {
                Some("23505") => {
                    let constraint = db.constraint().unwrap_or("unique constraint");
                    return RepositoryError::AlreadyExists(constraint.to_string());
                }
                Some("40001") | Some("40P01") => {
                    return RepositoryError::Serialization(db.message().to_string());
                }
                _ => {}
            }
        }
        RepositoryError::Sqlx(err)
    }
}
