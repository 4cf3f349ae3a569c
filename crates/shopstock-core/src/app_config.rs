/// Application configuration loaded from environment variables.
///
/// Secrets (`database_url`, `storage_key`) are redacted from the `Debug`
/// output so the config can be logged safely.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    /// Base URL of the object-storage host (e.g. `https://xyz.supabase.co`).
    pub storage_url: String,
    /// Service key sent as a bearer token on storage requests.
    pub storage_key: String,
    /// Bucket receiving uploaded product images.
    pub storage_bucket: String,
    pub log_level: String,
    pub http_timeout_secs: u64,
    pub http_user_agent: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("storage_url", &self.storage_url)
            .field("storage_key", &"[redacted]")
            .field("storage_bucket", &self.storage_bucket)
            .field("log_level", &self.log_level)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_user_agent", &self.http_user_agent)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
