use indexmap::IndexMap;

use crate::settings::DatabaseSettings;

/// Builds the command line for the vendor's interactive shell.
pub trait DatabaseClient {
    fn executable_name(&self) -> &'static str;

    /// Returns the program arguments and any extra environment variables.
    fn settings_to_cmd_args_env(
        &self,
        settings: &DatabaseSettings,
        parameters: &[String],
    ) -> (Vec<String>, IndexMap<String, String>);
}
