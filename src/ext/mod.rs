mod async_conversion;
mod relative_key_ext;

pub use async_conversion::AsyncTryFrom;
pub use relative_key_ext::RelativeKeyExt;
