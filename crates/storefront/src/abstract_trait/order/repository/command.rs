use crate::{
    domain::requests::order::CreateOrderRecordRequest,
    model::order::{Order, OrderWithItems},
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Reserve stock and insert the order as one atomic unit. Fails with
    /// `StockConflict` when any conditional decrement matches no row, with
    /// `AlreadyExists` when the idempotency key lost a concurrent race, and
    /// with `Serialization` on retryable storage contention. Nothing is
    /// committed on any failure.
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<OrderWithItems, RepositoryError>;

    /// Guarded transition to paid. Returns `None` when the guard matched no
    /// row (already paid by a concurrent caller).
    async fn mark_paid(
        &self,
        order_id: i32,
        payment_reference: &str,
    ) -> Result<Option<Order>, RepositoryError>;

    /// Guarded transition to delivered. Returns `None` when the guard matched
    /// no row.
    async fn mark_delivered(&self, order_id: i32) -> Result<Option<Order>, RepositoryError>;
}

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;
