pub mod default_funcs;
mod event_context;

pub use default_funcs::{FunctionDef, NativeFunction};
pub use event_context::EventContext;
