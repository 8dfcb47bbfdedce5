/// Get environment variable with MOORING_ prefix, falling back to unprefixed version
///
/// Checks for `MOORING_{key}` first, then falls back to `{key}` for
/// compatibility with standard environment variable naming.
///
/// # Examples
///
/// ```rust
/// use mooring::utils::get_env_with_prefix;
///
/// // Checks MOORING_REDIS_URL first, then REDIS_URL
/// let url = get_env_with_prefix("REDIS_URL");
///
/// // Checks MOORING_SESSION_ENGINE first, then SESSION_ENGINE
/// let engine = get_env_with_prefix("SESSION_ENGINE");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("MOORING_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}
