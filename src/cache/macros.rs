/// Read-through caching for async lookups.
///
/// Returns the cached value when present. Otherwise awaits `$block`, queues its
/// successful result for a background write with the given TTL (seconds) and
/// returns it. A failed cache read is logged and treated as a miss, so Redis
/// trouble only costs latency.
///
/// # Example
/// ```rust,ignore
/// let movie: TmdbMovie = cached!(cache, CacheKey::Movie { id, language }, ttl, async move {
///     fetch_movie(id).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            outcome => {
                if let Err(e) = outcome {
                    tracing::warn!(key = %key, error = %e, "Cache read failed, falling back to origin");
                }
                match $block.await {
                    Ok(value) => {
                        $cache.set_in_background(&key, &value, $ttl);
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }};
}
