//! In-process request mediator.
//!
//! Requests, queries and commands go to exactly one handler; notifications go
//! to every handler registered for their type. Both travel through the
//! decorators registered for them, first registered outermost.

pub mod config;
pub mod decorator;
pub mod error;
pub mod handler;
pub mod pipeline;
pub mod registry;
pub mod request;
pub mod sender;

pub use async_trait::async_trait;
pub use tokio_util::sync::CancellationToken;

pub use config::{Config, MediatorOptions, MissingHandlers, NotifyStrategy};
pub use decorator::{Decorator, LoggingDecorator, Next, Response, TypedDecorator};
pub use error::{ConfigError, DispatchError};
pub use handler::{NotificationHandler, RequestHandler};
pub use registry::{HandlerRegistry, Registry, RegistryBuilder};
pub use request::{Command, KindTag, MessageRef, Notification, Query, Request, RequestKind, kind};
pub use sender::{Sender, SenderBuilder};

#[cfg(feature = "derive")]
pub use mediator_macros::{Command, Notification, Query};
