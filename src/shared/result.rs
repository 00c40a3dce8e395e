/// Crate-wide result type.
///
/// Typed failures travel as `ScanError` values inside the `anyhow::Error`,
/// so callers can still downcast when they need the variant.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
