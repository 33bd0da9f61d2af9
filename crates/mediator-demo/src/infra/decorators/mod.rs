pub mod command_decorator;
pub mod query_decorator;
pub mod validation_decorator;

pub use command_decorator::CommandDecorator;
pub use query_decorator::QueryDecorator;
pub use validation_decorator::ValidationDecorator;
