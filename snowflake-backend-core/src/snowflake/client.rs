use indexmap::IndexMap;

use crate::backend::DatabaseClient;
use crate::settings::DatabaseSettings;

/// Environment variable `snowsql` reads the password from.
pub const PASSWORD_ENV: &str = "SNOWSQL_PWD";

#[derive(Debug, Clone, Copy, Default)]
pub struct SnowflakeClient;

impl DatabaseClient for SnowflakeClient {
    fn executable_name(&self) -> &'static str {
        "snowsql"
    }

    fn settings_to_cmd_args_env(
        &self,
        settings: &DatabaseSettings,
        parameters: &[String],
    ) -> (Vec<String>, IndexMap<String, String>) {
        let mut args = vec![self.executable_name().to_owned()];

        let flags = [
            ("-a", &settings.account),
            ("-u", &settings.user),
            ("-d", &settings.database),
            ("-s", &settings.schema),
            ("-w", &settings.warehouse),
            ("-r", &settings.role),
        ];
        for (flag, value) in flags {
            if let Some(value) = value.as_deref().filter(|value| !value.is_empty()) {
                args.push(flag.to_owned());
                args.push(value.to_owned());
            }
        }
        args.extend(parameters.iter().cloned());

        let mut env = IndexMap::new();
        if let Some(password) = settings.password.as_deref().filter(|p| !p.is_empty()) {
            env.insert(PASSWORD_ENV.to_owned(), password.to_owned());
        }

        (args, env)
    }
}
