pub mod binder;
pub mod compare;
pub mod context;
pub mod dispatch;
pub mod engine;
pub mod handlers;
pub mod postprocess;
pub mod request;
pub mod resolver;
pub mod rewrite;
pub mod templates;

pub use context::WidgetContext;
pub use dispatch::{HandlerRegistry, PageBase, PageBaseHandler, PageBaseRegistry, WidgetHandler};
pub use engine::WidgetEngine;
pub use request::WidgetRequest;
