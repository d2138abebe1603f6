#[cfg(test)]
mod tests {
    use lifedash::libs::config::{Config, DatabaseConfig, ServerConfig, CONFIG_FILE_NAME};
    use lifedash::libs::data_storage::DataStorage;
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        storage: DataStorage,
        _temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::with_base(temp_dir.path().join("lifedash"));
            ConfigTestContext {
                storage,
                _temp_dir: temp_dir,
            }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_file_gives_defaults(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.storage).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.server_config(), ServerConfig::default());
        assert_eq!(config.server_config().address(), "127.0.0.1:3030");
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_back(ctx: &mut ConfigTestContext) {
        let config = Config {
            server: Some(ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            }),
            database: Some(DatabaseConfig {
                path: Some(ctx.storage.base_path().join("custom.db")),
            }),
        };
        config.save_to(&ctx.storage).unwrap();

        assert_eq!(Config::read_from(&ctx.storage).unwrap(), config);
        assert_eq!(config.server_config().address(), "0.0.0.0:8080");
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_file(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        fs::write(&path, r#"{"server": {"host": "localhost", "port": 4000}}"#).unwrap();

        let config = Config::read_from(&ctx.storage).unwrap();
        assert_eq!(config.server_config().port, 4000);
        assert!(config.database.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_invalid_file_is_an_error(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let err = Config::read_from(&ctx.storage).unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse configuration");
    }
}
