use std::{
    ffi::{c_char, CStr},
    panic::{catch_unwind, AssertUnwindSafe},
    ptr,
};

use tracing::debug;

use super::ResultBuffer;
use crate::Program;

/// Evaluate `expression` against the JSON `event` in one call.
///
/// Returns a newly allocated string, or null if anything fails. A non-null
/// result must be released with [`free_evaluate`].
///
/// # Safety
/// Both arguments must be null or valid null-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn evaluate(expression: *const c_char, event: *const c_char) -> *mut c_char {
    guarded("evaluate", || {
        let expression = read_str(expression)?;
        let event = read_str(event)?;

        crate::evaluate(expression, event)
    })
}

/// Release a string returned by [`evaluate`] or [`evaluate_parsed`].
///
/// # Safety
/// `ptr` must be null or a result of this library not yet released.
#[no_mangle]
pub unsafe extern "C" fn free_evaluate(ptr: *mut c_char) {
    drop(ResultBuffer::from_raw(ptr));
}

/// Parse `expression` into a reusable handle, or null on a parse error.
/// Release it with [`free_parsed`].
///
/// # Safety
/// `expression` must be null or a valid null-terminated string.
#[no_mangle]
pub unsafe extern "C" fn parse(expression: *const c_char) -> *mut Program {
    let program = catch_unwind(AssertUnwindSafe(|| {
        let source = read_str(expression)?;

        Program::from_source(source)
            .map_err(|err| debug!(%err, "parse failed"))
            .ok()
    }));

    match program {
        Ok(Some(program)) => Box::into_raw(Box::new(program)),
        Ok(None) => ptr::null_mut(),
        Err(_) => {
            debug!("panic while parsing");
            ptr::null_mut()
        }
    }
}

/// Evaluate a handle from [`parse`] against the JSON `event`.
///
/// # Safety
/// `program` must be null or a live handle from [`parse`]; `event` must be
/// null or a valid null-terminated string.
#[no_mangle]
pub unsafe extern "C" fn evaluate_parsed(
    program: *const Program,
    event: *const c_char,
) -> *mut c_char {
    guarded("evaluate_parsed", || {
        let program = program.as_ref()?;
        let event = read_str(event)?;

        match program.eval_json(event) {
            Ok(val) => val.into_output(),
            Err(err) => {
                debug!(%err, kind = err.type_string(), "evaluation failed");
                None
            }
        }
    })
}

/// Release a handle returned by [`parse`].
///
/// # Safety
/// `program` must be null or a handle from [`parse`] not yet released.
#[no_mangle]
pub unsafe extern "C" fn free_parsed(program: *mut Program) {
    if !program.is_null() {
        drop(Box::from_raw(program));
    }
}

unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        debug!("null input pointer");
        return None;
    }

    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Some(s),
        Err(err) => {
            debug!(%err, "input is not utf-8");
            None
        }
    }
}

/// Run `f` without letting a panic unwind into the caller, and hand the
/// result over as a raw string.
fn guarded(name: &str, f: impl FnOnce() -> Option<String>) -> *mut c_char {
    let text = match catch_unwind(AssertUnwindSafe(f)) {
        Ok(text) => text,
        Err(_) => {
            debug!(call = name, "panic during call");
            None
        }
    };

    text.and_then(ResultBuffer::new)
        .map_or(ptr::null_mut(), ResultBuffer::into_raw)
}
