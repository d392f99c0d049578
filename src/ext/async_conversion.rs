/// Async counterpart to the standard library's `TryFrom<T>` trait.
///
/// Used for conversions that have to touch the filesystem, such as
/// turning a path into the digest of the file it points at.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
///
/// struct FileLength(u64);
///
/// impl AsyncTryFrom<&Path> for FileLength {
///     type Error = std::io::Error;
///
///     async fn async_try_from(path: &Path) -> Result<Self, Self::Error> {
///         let bytes = compio::fs::read(path).await?;
///         Ok(FileLength(bytes.len() as u64))
///     }
/// }
/// ```
pub trait AsyncTryFrom<T>: Sized {
    /// The error type that can occur during conversion.
    type Error;

    /// Performs the fallible asynchronous conversion from `T` to `Self`.
    async fn async_try_from(value: T) -> Result<Self, Self::Error>;
}
