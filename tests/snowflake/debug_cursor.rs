use std::time::Duration;

use log::LevelFilter;
use snowflake_backend::driver::{CopyStream, CopyToOptions};
use snowflake_backend::snowflake::{SnowflakeBackend, SnowflakeDatabaseWrapper};
use snowflake_backend::testing::{CopyCall, MockDriver};
use snowflake_backend::{DatabaseSettings, DriverError, Error};

fn wrapper() -> (MockDriver, SnowflakeDatabaseWrapper<MockDriver>) {
    let _ = env_logger::builder().is_test(true).try_init();

    let settings = DatabaseSettings::new()
        .database("D")
        .user("U")
        .password("P")
        .account("A")
        .warehouse("W")
        .role("R")
        .schema("S");

    let driver = MockDriver::new();
    let mut db =
        SnowflakeDatabaseWrapper::new(SnowflakeBackend::new(driver.clone()), settings, "default");
    db.log_settings_mut()
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_secs(5));

    (driver, db)
}

#[test]
fn test_snowflake_forced_debug_cursor_records_statements() -> anyhow::Result<()> {
    let (driver, mut db) = wrapper();
    db.force_debug_cursor = true;

    let mut cursor = db.cursor()?;
    assert!(cursor.is_debug());

    cursor.execute("SELECT 1", &[])?;
    cursor.executemany(
        "INSERT INTO t VALUES (%s)",
        &[vec![serde_json::json!(1)], vec![serde_json::json!(2)]],
    )?;

    let queries = db.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].sql, "SELECT 1");
    assert_eq!(queries[1].sql, "2 times: INSERT INTO t VALUES (%s)");
    assert_eq!(
        driver.executed(),
        [
            "SELECT 1",
            "INSERT INTO t VALUES (%s)",
            "INSERT INTO t VALUES (%s)"
        ]
    );

    db.reset_queries();
    assert!(db.queries().is_empty());

    Ok(())
}

#[test]
fn test_snowflake_failed_statements_are_still_recorded() -> anyhow::Result<()> {
    let (driver, mut db) = wrapper();
    driver.fail_on(
        "SELEC 1",
        DriverError::new("syntax error line 1 at position 0").with_code("001003"),
    );

    let mut cursor = db.debug_cursor()?;
    let err = cursor.execute("SELEC 1", &[]).unwrap_err();

    assert!(matches!(err, Error::Driver(_)));
    assert_eq!(db.queries().len(), 1);

    Ok(())
}

#[test]
fn test_snowflake_copy_expert_passes_through() -> anyhow::Result<()> {
    let (driver, mut db) = wrapper();

    let mut cursor = db.debug_cursor()?;
    let mut input: &[u8] = b"1,one\n2,two\n";
    cursor.copy_expert("COPY INTO t FROM STDIN", CopyStream::Read(&mut input), Some(1024))?;

    assert_eq!(
        driver.copies(),
        [CopyCall::Expert {
            sql: "COPY INTO t FROM STDIN".into(),
            size: Some(1024),
            data: b"1,one\n2,two\n".to_vec(),
        }]
    );

    let queries = db.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].sql, "COPY INTO t FROM STDIN");

    Ok(())
}

#[test]
fn test_snowflake_copy_expert_logs_once_on_failure() -> anyhow::Result<()> {
    let (driver, mut db) = wrapper();
    driver.fail_on("COPY INTO t FROM STDIN", DriverError::new("stage does not exist"));

    let mut cursor = db.debug_cursor()?;
    let mut sink = Vec::new();
    let result = cursor.copy_expert("COPY INTO t FROM STDIN", CopyStream::Write(&mut sink), None);

    assert!(matches!(result, Err(Error::Driver(ref e)) if e.to_string() == "stage does not exist"));
    assert_eq!(driver.copies().len(), 1);
    assert_eq!(db.queries().len(), 1);

    Ok(())
}

#[test]
fn test_snowflake_copy_to_logs_the_copy_statement() -> anyhow::Result<()> {
    let (driver, mut db) = wrapper();
    driver.returning(
        "COPY users TO STDOUT",
        vec![
            vec![serde_json::json!(1), serde_json::json!("ada")],
            vec![serde_json::json!(2), serde_json::Value::Null],
        ],
    );

    let options = CopyToOptions {
        sep: ",".into(),
        ..CopyToOptions::default()
    };

    let mut cursor = db.debug_cursor()?;
    let mut out = Vec::new();
    cursor.copy_to(&mut out, "users", &options)?;

    assert_eq!(String::from_utf8(out)?, "1,ada\n2,\\N\n");
    assert_eq!(
        driver.copies(),
        [CopyCall::To {
            table: "users".into(),
            options,
        }]
    );
    assert_eq!(db.queries()[0].sql, "COPY users TO STDOUT");

    Ok(())
}

#[test]
fn test_snowflake_cursor_creation_is_async_unsafe() -> anyhow::Result<()> {
    let (_, mut db) = wrapper();
    db.ensure_connection()?;

    let rt = tokio::runtime::Builder::new_current_thread().build()?;
    let err = rt.block_on(async { db.debug_cursor().unwrap_err() });

    assert!(matches!(err, Error::SynchronousOnly("create_cursor")));

    Ok(())
}
