use mediator::{HandlerRegistry, LoggingDecorator};

use crate::{
    domain::{
        commands::{self, SaySomethingCommand},
        notifications::{self, GreetingCounter},
        queries,
    },
    infra::decorators::{CommandDecorator, QueryDecorator, ValidationDecorator},
};

/// Registers every handler of the demo. Decorators run in the order listed.
pub fn build(counter: GreetingCounter) -> HandlerRegistry {
    HandlerRegistry::builder()
        .configure(queries::register)
        .configure(commands::register)
        .configure(|builder| notifications::register(builder, counter))
        .decorator(LoggingDecorator::new())
        .typed_decorator::<SaySomethingCommand, _>(ValidationDecorator::new())
        .decorator(QueryDecorator::new())
        .decorator(CommandDecorator::new())
        .build()
}
