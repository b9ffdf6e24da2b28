//! mjc CLI entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command handler.

use clap::{CommandFactory, Parser, Subcommand};
use mjc::commands::{
    compile_command, config_set_command, config_show_command, health_command, login_command,
    theme_command, tui_command, ThemeAction, TuiOptions,
};
use mjc::completion::{print_completion_script, ShellType, SUPPORTED_SHELLS};
use mjc::config::{load_config, validate_config, Config};
use mjc::error::{MjcError, Result};
use mjc::logging::{self, LogTarget};
use mjc::output::print_error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mjc")]
#[command(
    version,
    about = "Terminal client for a MiniJava compilation service",
    after_help = "EXAMPLES:
    # Open the editor UI (login screen first)
    mjc
    mjc tui --source program.mjava

    # Compile a file and print assembly, diagram and symbols
    mjc compile program.mjava
    mjc compile program.mjava --username alice --password secret

    # Check that the service is up
    mjc health

    # Point at another server for one invocation
    mjc --server http://10.0.0.5:4567 compile program.mjava"
)]
struct Cli {
    /// Override the configured compiler service URL
    #[arg(long, global = true, value_name = "URL")]
    server: Option<String>,

    /// Log at debug level (logs go to stderr, or to the log file for the TUI)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive editor (the default when no command is given)
    Tui {
        /// Source file to edit; created with a sample program if missing
        #[arg(long, value_name = "FILE")]
        source: Option<PathBuf>,

        /// Start on the workspace instead of the login screen
        #[arg(long)]
        skip_login: bool,
    },

    /// Compile a source file and print every result channel
    Compile {
        /// MiniJava source file
        file: PathBuf,

        /// Sign in before compiling
        #[arg(long, requires = "password")]
        username: Option<String>,

        #[arg(long, requires = "username")]
        password: Option<String>,
    },

    /// Check credentials against the service
    Login {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Probe the compiler service
    Health,

    /// Show or toggle the light/dark theme preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeSubcommand>,
    },

    /// Show or update configuration
    #[command(after_help = "EXAMPLES:
    mjc config                                   # Show current config
    mjc config set server_url http://host:4567   # Change the server
    mjc config set save_diagrams true            # Keep rendered SVGs")]
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },

    /// Output shell completion script
    #[command(hide = true)]
    Completions {
        /// Shell type to generate completions for (bash, zsh, or fish)
        shell: String,
    },
}

#[derive(Subcommand)]
enum ThemeSubcommand {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Set a configuration value
    Set {
        /// Configuration key (server_url, session_expiry_redirect_ms, login_redirect_ms, renderer, save_diagrams)
        key: String,
        value: String,
    },
}

/// Load the config file and apply the `--server` override.
fn resolve_config(server: Option<&str>) -> Result<Config> {
    let mut config = load_config()?;
    if let Some(url) = server {
        config.server_url = url.to_string();
        validate_config(&config).map_err(|e| MjcError::Config(e.to_string()))?;
    }
    Ok(config)
}

fn log_target(command: Option<&Commands>) -> Result<LogTarget> {
    match command {
        None | Some(Commands::Tui { .. }) => LogTarget::default_file(),
        Some(_) => Ok(LogTarget::Stderr),
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    // Completions and config set need neither logging nor a valid config
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            let shell = ShellType::from_name(shell).map_err(|e| {
                MjcError::ShellCompletion(format!(
                    "{}\nSupported shells: {}",
                    e,
                    SUPPORTED_SHELLS.join(", ")
                ))
            })?;
            return print_completion_script(shell, &mut Cli::command());
        }
        Some(Commands::Config {
            subcommand: Some(ConfigSubcommand::Set { key, value }),
        }) => return config_set_command(key, value),
        _ => {}
    }

    logging::init(log_target(cli.command.as_ref())?, cli.verbose)?;
    let config = resolve_config(cli.server.as_deref())?;
    tracing::debug!(server = %config.server_url, "configuration loaded");

    match cli.command {
        None => tui_command(&config, TuiOptions::default()),
        Some(Commands::Tui { source, skip_login }) => {
            tui_command(&config, TuiOptions { source, skip_login })
        }
        Some(Commands::Compile {
            file,
            username,
            password,
        }) => compile_command(&config, &file, username.zip(password)),
        Some(Commands::Login { username, password }) => {
            login_command(&config, &username, &password)
        }
        Some(Commands::Health) => health_command(&config),
        Some(Commands::Theme { action }) => theme_command(match action {
            Some(ThemeSubcommand::Toggle) => ThemeAction::Toggle,
            Some(ThemeSubcommand::Show) | None => ThemeAction::Show,
        }),
        Some(Commands::Config { subcommand: None }) => config_show_command(&config),
        // Handled before logging is set up
        Some(Commands::Config {
            subcommand: Some(ConfigSubcommand::Set { .. }),
        })
        | Some(Commands::Completions { .. }) => unreachable!(),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        tracing::error!(error = %e, "command failed");
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_defaults_to_tui() {
        let cli = Cli::try_parse_from(["mjc"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(log_target(cli.command.as_ref()), Ok(LogTarget::File(_))));
    }

    #[test]
    fn test_tui_flags() {
        let cli = Cli::try_parse_from(["mjc", "tui", "--source", "a.mjava", "--skip-login"]).unwrap();
        match cli.command {
            Some(Commands::Tui { source, skip_login }) => {
                assert_eq!(source, Some(PathBuf::from("a.mjava")));
                assert!(skip_login);
            }
            _ => panic!("Expected Tui command"),
        }
    }

    #[test]
    fn test_compile_requires_file() {
        assert!(Cli::try_parse_from(["mjc", "compile"]).is_err());
        let cli = Cli::try_parse_from(["mjc", "compile", "main.mjava"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Compile { .. })));
        assert_eq!(log_target(cli.command.as_ref()).unwrap(), LogTarget::Stderr);
    }

    #[test]
    fn test_compile_credentials_come_in_pairs() {
        assert!(Cli::try_parse_from(["mjc", "compile", "a.mjava", "--username", "u"]).is_err());
        let cli = Cli::try_parse_from([
            "mjc", "compile", "a.mjava", "--username", "u", "--password", "p",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Compile {
                username, password, ..
            }) => assert_eq!(username.zip(password), Some(("u".into(), "p".into()))),
            _ => panic!("Expected Compile command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["mjc", "health", "--server", "http://h:1", "-v"]).unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://h:1"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_theme_subcommands() {
        let cli = Cli::try_parse_from(["mjc", "theme"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Theme { action: None })));
        let cli = Cli::try_parse_from(["mjc", "theme", "toggle"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Theme {
                action: Some(ThemeSubcommand::Toggle)
            })
        ));
    }

    #[test]
    fn test_config_set_parses() {
        let cli = Cli::try_parse_from(["mjc", "config", "set", "renderer", "dot"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                subcommand: Some(ConfigSubcommand::Set { .. })
            })
        ));
    }

    #[test]
    fn test_completions_is_hidden() {
        let cmd = Cli::command();
        let completions = cmd
            .get_subcommands()
            .find(|c| c.get_name() == "completions")
            .unwrap();
        assert!(completions.is_hide_set());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
