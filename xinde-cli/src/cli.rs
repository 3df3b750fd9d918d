use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "xinde",
    version,
    about = "Client for the Xinde identity-verification API",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the service (overrides the config file)
    #[arg(long, global = true, env = "XINDE_BASE_URL")]
    pub base_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign a request URL with an app secret
    SignUrl {
        /// URL to sign, e.g. "https://api.xindedata.com/v1/task?appid=myappid&time=1467372594".
        /// Quote it on the command line so the shell leaves '&' alone.
        url: String,

        /// App secret issued with the app id
        app_secret: String,
    },

    /// Submit a task checking that a name and a national ID number match
    CreateTaskDemo {
        /// App id issued by Xinde
        app_id: String,

        /// App secret issued with the app id
        app_secret: String,

        /// Full name of the person to verify
        name: String,

        /// National ID number of the person to verify
        id_number: String,
    },

    /// Query the status of a task
    GetTaskStatus {
        /// Task id returned when the task was created
        task_id: String,

        /// App id issued by Xinde
        app_id: String,

        /// App secret issued with the app id
        app_secret: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a configuration file with default values
    Init {
        /// Overwrite existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key to set (base_url, timeout_secs)
        key: String,

        /// Value to set
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to get (omit to show all)
        key: Option<String>,
    },

    /// Show the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sign_url() {
        let cli = Cli::try_parse_from([
            "xinde",
            "sign-url",
            "https://api.xindedata.com/v1/task?appid=myappid&time=1467372594",
            "mySecret",
        ])
        .unwrap();

        match cli.command {
            Commands::SignUrl { url, app_secret } => {
                assert!(url.ends_with("time=1467372594"));
                assert_eq!(app_secret, "mySecret");
            }
            other => panic!("Expected SignUrl, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_create_task_demo() {
        let cli = Cli::try_parse_from([
            "xinde",
            "--json",
            "create-task-demo",
            "myappid",
            "mySecret",
            "张三",
            "110101199003074477",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::CreateTaskDemo {
                app_id,
                name,
                id_number,
                ..
            } => {
                assert_eq!(app_id, "myappid");
                assert_eq!(name, "张三");
                assert_eq!(id_number, "110101199003074477");
            }
            other => panic!("Expected CreateTaskDemo, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_get_task_status_with_base_url() {
        let cli = Cli::try_parse_from([
            "xinde",
            "get-task-status",
            "42",
            "myappid",
            "mySecret",
            "--base-url",
            "http://127.0.0.1:8080",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:8080"));
        assert!(matches!(cli.command, Commands::GetTaskStatus { ref task_id, .. } if task_id == "42"));
    }

    #[test]
    fn test_wrong_argument_count_is_rejected() {
        let err = Cli::try_parse_from(["xinde", "sign-url", "https://example.com/?a=1"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["xinde", "get-task-status", "1", "2", "3", "4"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
