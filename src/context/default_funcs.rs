use tracing::debug;

use crate::{EvalError, EvalResult, Value};

mod math;
mod string;

/// Native implementation of a builtin. Arguments arrive already evaluated.
pub type NativeFunction = fn(Vec<Value>) -> EvalResult<Value>;

/// One entry of the builtin table.
#[derive(Debug)]
pub struct FunctionDef {
    pub name: &'static str,
    pub min_args: usize,
    /// `None` means variadic.
    pub max_args: Option<usize>,
    func: NativeFunction,
}

const DEFAULT_FUNCS: &[FunctionDef] = &[
    FunctionDef::variadic("concat", 1, string::concat_impl),
    FunctionDef::ranged("round", 1, 2, math::round_impl),
    FunctionDef::ranged("ceil", 1, 2, math::ceil_impl),
    FunctionDef::ranged("floor", 1, 2, math::floor_impl),
    FunctionDef::variadic("min", 1, math::min_impl),
    FunctionDef::variadic("max", 1, math::max_impl),
];

impl FunctionDef {
    const fn ranged(
        name: &'static str,
        min_args: usize,
        max_args: usize,
        func: NativeFunction,
    ) -> FunctionDef {
        FunctionDef {
            name,
            min_args,
            max_args: Some(max_args),
            func,
        }
    }

    const fn variadic(name: &'static str, min_args: usize, func: NativeFunction) -> FunctionDef {
        FunctionDef {
            name,
            min_args,
            max_args: None,
            func,
        }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.map_or(true, |max| count <= max)
    }

    /// Check arity, then run the native rule.
    pub fn call(&self, args: Vec<Value>) -> EvalResult<Value> {
        if !self.accepts(args.len()) {
            let expected = match self.max_args {
                Some(max) if max == self.min_args => format!("{}", max),
                Some(max) => format!("{} to {}", self.min_args, max),
                None => format!("at least {}", self.min_args),
            };

            return Err(EvalError::InvalidCall(format!(
                "{}() expects {} argument(s), got {}",
                self.name,
                expected,
                args.len()
            )));
        }

        debug!(function = self.name, argc = args.len(), "dispatching builtin");
        (self.func)(args)
    }
}

/// Find a builtin by name, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<&'static FunctionDef> {
    DEFAULT_FUNCS
        .iter()
        .find(|def| def.name.eq_ignore_ascii_case(name))
}

pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    DEFAULT_FUNCS.iter().map(|def| def.name)
}
