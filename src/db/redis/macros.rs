/// Read-through caching for async fetches.
///
/// Returns the value cached under `$key` if present. Otherwise awaits
/// `$fetch` (a future yielding `AppResult<T>`), queues the value for storage
/// with `$ttl` seconds to live, and returns it. Fetch errors are not cached.
///
/// Must be used inside a function returning `AppResult`.
///
/// ```rust,ignore
/// cached!(self.cache, CacheKey::TitleSearch(query.to_string()), SEARCH_TTL, async move {
///     self.fetch_search(query).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $fetch:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await? {
            Some(hit) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(hit)
            }
            None => {
                let value = $fetch.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
