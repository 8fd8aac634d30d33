pub mod eval_error;
pub mod value;

pub use eval_error::{EvalError, EvalResult};
pub use value::Value;
