mod command;
mod lifecycle;
mod query;

pub use self::command::{OrderCommandService, OrderCommandServiceDeps};
pub use self::lifecycle::{OrderLifecycleService, OrderLifecycleServiceDeps};
pub use self::query::OrderQueryService;

#[cfg(test)]
pub(crate) mod testutil;
