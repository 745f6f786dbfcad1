//! tests/config_tests.rs

#[cfg(test)]
mod tests {
    use crate::config::forensics_config::ForensicsConfig;
    use crate::config::server_config::ServerConfig;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5022);
        assert_eq!(config.workers, 1);
        assert!(config.database_url.is_none());
        assert_eq!(config.max_payload_bytes(), 64 * 1024 * 1024);
    }

    #[test]
    fn test_forensics_defaults_are_in_range() {
        let c = ForensicsConfig::default();
        assert!(c.default_similarity_threshold >= c.min_similarity_threshold);
        assert!(c.default_similarity_threshold <= c.max_similarity_threshold);
        assert!((c.min_shared_assets_floor..=c.min_shared_assets_ceiling)
            .contains(&c.default_min_shared_assets));
    }
}
