mod command;
mod lifecycle;
mod query;

pub use self::command::{DynOrderCommandService, OrderCommandServiceTrait};
pub use self::lifecycle::{DynOrderLifecycleService, OrderLifecycleServiceTrait};
pub use self::query::{DynOrderQueryService, OrderQueryServiceTrait};
