#[cfg(feature = "c_api")]
pub mod c_api;
mod result_buffer;

pub use result_buffer::ResultBuffer;
