#[cfg(test)]
mod tests {
    use lifedash::db::db::Db;
    use lifedash::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use lifedash::libs::module::Module;
    use rusqlite::Connection;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            MigrationTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl MigrationTestContext {
        fn raw_connection(&self) -> Connection {
            Db::open_without_migrations(self.temp_dir.path().join("lifedash.db")).unwrap()
        }
    }

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'index') AND name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            == 1
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_run_on_open(ctx: &mut MigrationTestContext) {
        let db = Db::open(ctx.temp_dir.path().join("lifedash.db")).unwrap();

        assert_eq!(get_db_version(&db.conn).unwrap(), MigrationManager::new().latest_version());
        assert!(!needs_migration(&db.conn).unwrap());

        assert!(table_exists(&db.conn, "users"));
        assert!(table_exists(&db.conn, "sessions"));
        for module in Module::ALL {
            let table = module.schema().table;
            assert!(table_exists(&db.conn, table), "missing table {}", table);
            assert!(table_exists(&db.conn, &format!("idx_{}_user_date", table)), "missing index for {}", table);
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_needs_migration(ctx: &mut MigrationTestContext) {
        let mut conn = ctx.raw_connection();
        conn.execute(
            "CREATE TABLE migrations (id INTEGER PRIMARY KEY, version INTEGER NOT NULL UNIQUE, name TEXT NOT NULL, applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP)",
            [],
        )
        .unwrap();
        assert!(needs_migration(&conn).unwrap());

        MigrationManager::new().run_migrations(&mut conn).unwrap();
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_history(ctx: &mut MigrationTestContext) {
        let mut conn = ctx.raw_connection();
        let manager = MigrationManager::new();
        manager.run_migrations(&mut conn).unwrap();

        let history = manager.get_migration_history(&conn).unwrap();
        assert_eq!(history.len() as u32, manager.latest_version());
        for (i, (version, name, _)) in history.iter().enumerate() {
            assert_eq!(*version as usize, i + 1);
            assert!(!name.is_empty());
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_idempotency(ctx: &mut MigrationTestContext) {
        let mut conn = ctx.raw_connection();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();
        let version1 = get_db_version(&conn).unwrap();
        manager.run_migrations(&mut conn).unwrap();
        let version2 = get_db_version(&conn).unwrap();

        assert_eq!(version1, version2);
        assert_eq!(manager.get_migration_history(&conn).unwrap().len() as u32, version2);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_reopen_keeps_data(ctx: &mut MigrationTestContext) {
        let path = ctx.temp_dir.path().join("lifedash.db");
        {
            let db = Db::open(&path).unwrap();
            db.conn
                .execute("INSERT INTO users (id, name, created_at) VALUES ('u1', 'alice', '2026-01-01T00:00:00.000Z')", [])
                .unwrap();
        }

        let db = Db::open(&path).unwrap();
        let count: i64 = db.conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 1);
    }
}
