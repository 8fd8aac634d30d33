use std::ffi::{c_char, CStr, CString};

/// An evaluation result owned across the C boundary.
///
/// `into_raw` hands ownership to the caller; the only way back is
/// `from_raw`, which takes it again so the buffer is dropped exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct ResultBuffer(CString);

impl ResultBuffer {
    /// `None` when the text holds an interior NUL and cannot cross as a C string.
    pub fn new(text: String) -> Option<ResultBuffer> {
        CString::new(text).ok().map(ResultBuffer)
    }

    pub fn as_c_str(&self) -> &CStr {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_raw(self) -> *mut c_char {
        self.0.into_raw()
    }

    /// Reclaim a buffer previously released with [`ResultBuffer::into_raw`].
    ///
    /// # Safety
    /// `ptr` must be null or a pointer returned by `into_raw` that has not
    /// been reclaimed yet.
    pub unsafe fn from_raw(ptr: *mut c_char) -> Option<ResultBuffer> {
        if ptr.is_null() {
            None
        } else {
            Some(ResultBuffer(CString::from_raw(ptr)))
        }
    }
}
