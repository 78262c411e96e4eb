mod command;

pub use self::command::ReviewCommandService;
