//! Continuation folding.
//!
//! Decorators are registered in the order they should run. Wrapping has to
//! start from the innermost layer, so the list is walked back to front: the
//! first registered decorator ends up outermost, runs first and completes
//! last.

use std::sync::Arc;

use futures_util::FutureExt;

use crate::decorator::{Decorator, Next};
use crate::request::MessageRef;

pub fn wrap<'a>(
    message: MessageRef<'a>,
    terminal: Next<'a>,
    decorators: &[Arc<dyn Decorator>],
) -> Next<'a> {
    decorators.iter().rev().fold(terminal, |next, decorator| {
        let decorator = Arc::clone(decorator);
        Next::new(move |cancel| {
            let decorator = Arc::clone(&decorator);
            let next = next.clone();
            async move { decorator.decorate(message, next, cancel).await }.boxed()
        })
    })
}
