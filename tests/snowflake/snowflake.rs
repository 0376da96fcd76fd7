use snowflake_backend::snowflake::{
    MissingSetting, SnowflakeBackend, SnowflakeConnectOptions, SnowflakeDatabaseWrapper,
    LIVENESS_SQL,
};
use snowflake_backend::testing::MockDriver;
use snowflake_backend::{Backend, DatabaseSettings, DriverError, Error};

fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn settings() -> DatabaseSettings {
    DatabaseSettings::new()
        .database("D")
        .user("U")
        .password("P")
        .account("A")
        .warehouse("W")
        .role("R")
        .schema("S")
}

fn wrapper(settings: DatabaseSettings) -> (MockDriver, SnowflakeDatabaseWrapper<MockDriver>) {
    setup();
    let driver = MockDriver::new();
    let wrapper =
        SnowflakeDatabaseWrapper::new(SnowflakeBackend::new(driver.clone()), settings, "default");
    (driver, wrapper)
}

fn missing(err: &Error) -> &MissingSetting {
    match err {
        Error::Configuration(source) => source
            .downcast_ref::<MissingSetting>()
            .expect("a missing setting"),
        other => panic!("expected a configuration error, got {:?}", other),
    }
}

#[test]
fn test_snowflake_resolves_exactly_seven_params() -> anyhow::Result<()> {
    let (_, db) = wrapper(settings());

    let options = db.get_connection_params()?;
    let params = options.as_params();

    assert_eq!(params.len(), 7);
    assert_eq!(params["database"], "D");
    assert_eq!(params["user"], "U");
    assert_eq!(params["password"], "P");
    assert_eq!(params["account"], "A");
    assert_eq!(params["warehouse"], "W");
    assert_eq!(params["role"], "R");
    assert_eq!(params["schema"], "S");

    Ok(())
}

#[test]
fn test_snowflake_missing_keys_fail_before_connecting() {
    let keys = [
        "DATABASE",
        "USER",
        "PASSWORD",
        "ACCOUNT",
        "WAREHOUSE",
        "ROLE",
        "SCHEMA",
    ];

    for key in keys {
        let mut settings = settings();
        match key {
            "DATABASE" => settings.database = None,
            "USER" => settings.user = None,
            "PASSWORD" => settings.password = None,
            "ACCOUNT" => settings.account = None,
            "WAREHOUSE" => settings.warehouse = None,
            "ROLE" => settings.role = None,
            _ => settings.schema = None,
        }

        let (driver, mut db) = wrapper(settings);
        let err = db.connect().unwrap_err();

        assert!(err.is_configuration(), "{}", key);
        assert_eq!(missing(&err).key, key);
        assert_eq!(driver.connect_count(), 0, "{}", key);
    }
}

#[test]
fn test_snowflake_missing_user_names_the_username() {
    let settings = settings().user("");
    let (_, db) = wrapper(settings);

    let err = db.get_connection_params().unwrap_err();
    assert_eq!(
        missing(&err).to_string(),
        "Please provide a username for snowflake!"
    );
}

#[test]
fn test_snowflake_connects_lazily_with_resolved_params() -> anyhow::Result<()> {
    let (driver, mut db) = wrapper(settings());
    assert!(!db.is_connected());

    db.ensure_connection()?;
    db.ensure_connection()?;

    assert_eq!(driver.connect_count(), 1);
    assert_eq!(
        driver.last_params(),
        Some(
            SnowflakeConnectOptions::new()
                .database("D")
                .user("U")
                .password("P")
                .account("A")
                .warehouse("W")
                .role("R")
                .schema("S")
        )
    );

    Ok(())
}

#[test]
fn test_snowflake_connect_failures_pass_through() {
    let (driver, mut db) = wrapper(settings());
    driver.fail_connect(
        DriverError::new("Incorrect username or password was specified.").with_code("390100"),
    );

    let err = db.connect().unwrap_err();

    assert!(matches!(err, Error::Driver(_)));
    assert!(!db.is_connected());
}

#[test]
fn test_snowflake_autocommit_round_trips() -> anyhow::Result<()> {
    use snowflake_backend::DriverConnection;

    let (_, mut db) = wrapper(settings());

    db.set_autocommit(false)?;
    assert!(!db.get_autocommit()?);
    assert!(!db.connection()?.autocommit());

    db.set_autocommit(true)?;
    assert!(db.get_autocommit()?);
    assert!(db.connection()?.autocommit());

    Ok(())
}

#[test]
fn test_snowflake_autocommit_failures_are_database_errors() -> anyhow::Result<()> {
    let (driver, mut db) = wrapper(settings());
    db.ensure_connection()?;

    driver.fail_autocommit(Some(
        DriverError::new("Session no longer exists").with_code("390111"),
    ));
    let err = db.set_autocommit(false).unwrap_err();

    let database_error = err.as_database_error().expect("a database error");
    assert_eq!(database_error.message(), "Session no longer exists");
    assert!(db.get_autocommit()?);

    Ok(())
}

#[test]
fn test_snowflake_failed_setup_closes_the_new_connection() {
    let (driver, mut db) = wrapper(settings());
    driver.fail_autocommit(Some(DriverError::new("boom")));

    let err = db.connect().unwrap_err();

    assert!(matches!(err, Error::Database(_)));
    assert_eq!(driver.connect_count(), 1);
    assert_eq!(driver.closed_connections(), 1);
    assert!(!db.is_connected());
}

#[test]
fn test_snowflake_autocommit_setting_applies_on_connect() -> anyhow::Result<()> {
    use snowflake_backend::DriverConnection;

    let (_, mut db) = wrapper(settings().autocommit(false));

    assert!(!db.connection()?.autocommit());
    assert!(!db.get_autocommit()?);

    Ok(())
}

#[test]
fn test_snowflake_is_usable_follows_the_probe() -> anyhow::Result<()> {
    let (driver, mut db) = wrapper(settings());
    assert!(!db.is_usable());

    db.ensure_connection()?;
    assert!(db.is_usable());
    assert_eq!(driver.executed(), [LIVENESS_SQL]);

    driver.fail_on(LIVENESS_SQL, DriverError::new("Session no longer exists"));
    assert!(!db.is_usable());

    Ok(())
}

#[test]
fn test_snowflake_refuses_to_connect_inside_a_runtime() {
    let (driver, mut db) = wrapper(settings());

    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let err = rt.block_on(async move { db.connect().unwrap_err() });

    assert!(matches!(err, Error::SynchronousOnly("get_new_connection")));
    assert_eq!(driver.connect_count(), 0);
}

#[test]
fn test_snowflake_close_resets_the_connection() -> anyhow::Result<()> {
    let (driver, mut db) = wrapper(settings());
    driver.returning(LIVENESS_SQL, vec![vec![serde_json::json!("8.41.2")]]);

    db.ensure_connection()?;
    assert_eq!(db.server_version()?, "8.41.2");

    db.close()?;
    assert!(!db.is_connected());
    assert_eq!(driver.closed_connections(), 1);

    // closing twice is a no-op
    db.close()?;
    assert_eq!(driver.closed_connections(), 1);

    Ok(())
}

#[test]
fn test_snowflake_server_version_uses_a_temporary_connection() -> anyhow::Result<()> {
    let (driver, mut db) = wrapper(settings());
    driver.returning(LIVENESS_SQL, vec![vec![serde_json::json!("8.41.2")]]);

    assert_eq!(db.server_version()?, "8.41.2");
    assert!(!db.is_connected());
    assert_eq!(driver.closed_connections(), 1);

    Ok(())
}

#[test]
fn test_snowflake_commit_and_rollback_reach_the_driver() -> anyhow::Result<()> {
    let (driver, mut db) = wrapper(settings());

    // nothing to do without a connection
    db.commit()?;
    assert_eq!(driver.commits(), 0);

    db.ensure_connection()?;
    db.commit()?;
    db.rollback()?;

    assert_eq!(driver.commits(), 1);
    assert_eq!(driver.rollbacks(), 1);

    Ok(())
}

#[test]
fn test_snowflake_closes_obsolete_connections() -> anyhow::Result<()> {
    // CONN_MAX_AGE = 0 closes at the end of every request
    let (_, mut db) = wrapper(settings());
    db.ensure_connection()?;
    db.close_if_unusable_or_obsolete()?;
    assert!(!db.is_connected());

    // persistent connections survive
    let (_, mut db) = wrapper(settings().conn_max_age(None));
    db.ensure_connection()?;
    db.close_if_unusable_or_obsolete()?;
    assert!(db.is_connected());

    // unless autocommit was left changed
    db.set_autocommit(false)?;
    db.close_if_unusable_or_obsolete()?;
    assert!(!db.is_connected());

    Ok(())
}

#[test]
fn test_snowflake_closes_broken_connections_after_errors() -> anyhow::Result<()> {
    let (driver, mut db) = wrapper(settings().conn_max_age(None));
    db.ensure_connection()?;

    driver.fail_autocommit(Some(DriverError::new("Session no longer exists")));
    assert!(db.set_autocommit(true).is_err());
    driver.fail_on(LIVENESS_SQL, DriverError::new("Session no longer exists"));

    db.close_if_unusable_or_obsolete()?;
    assert!(!db.is_connected());

    Ok(())
}

#[test]
fn test_snowflake_plain_cursors_are_not_logged() -> anyhow::Result<()> {
    let (driver, mut db) = wrapper(settings());
    driver.returning("SELECT 1", vec![vec![serde_json::json!(1)]]);

    let mut cursor = db.cursor()?;
    if cursor.is_debug() {
        // db.backends debug logging is enabled for this run
        return Ok(());
    }

    cursor.execute("SELECT 1", &[])?;
    assert_eq!(cursor.fetchone()?, Some(vec![serde_json::json!(1)]));
    assert_eq!(cursor.fetchone()?, None);
    assert!(db.queries().is_empty());

    Ok(())
}

#[test]
fn test_snowflake_backend_tables() {
    let (_, db) = wrapper(settings());

    assert_eq!(db.vendor(), "snowflake");
    assert_eq!(db.display_name(), "Snowflake");
    assert_eq!(db.data_types()["DateTimeField"], "timestamp with time zone");
    assert_eq!(db.operators()["icontains"], "LIKE UPPER(%s)");
    assert_eq!(db.pattern_ops()["iendswith"], "LIKE '%%' || UPPER({})");
    assert!(db.pattern_esc().starts_with("REPLACE(REPLACE(REPLACE({}"));
    assert_eq!(
        db.db_type("CharField", &[("max_length", "32")]).unwrap().as_deref(),
        Some("varchar(32)")
    );
    assert_eq!(
        db.db_check("PositiveSmallIntegerField", "age").unwrap().as_deref(),
        Some(r#""age" >= 0"#)
    );
    assert_eq!(<SnowflakeBackend<MockDriver> as Backend>::VENDOR, "snowflake");
}

#[test]
fn test_snowflake_huge_max_age_never_expires() -> anyhow::Result<()> {
    let mut json = serde_json::to_value(settings())?;
    json["CONN_MAX_AGE"] = serde_json::json!(u64::MAX);
    let settings = DatabaseSettings::from_json(&json.to_string())?;
    assert_eq!(settings.conn_max_age, Some(u64::MAX));

    let (_, mut db) = wrapper(settings);
    db.connect()?;
    db.close_if_unusable_or_obsolete()?;
    assert!(db.is_connected());

    Ok(())
}
