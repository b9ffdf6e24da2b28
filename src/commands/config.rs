//! Config command handler.
//!
//! Displays and modifies mjc configuration values.

use crate::config::{
    config_path, load_config, save_config, set_config_value, toml_string, Config,
};
use crate::error::Result;
use crate::output::{print_success, BOLD, CYAN, GRAY, RESET};

/// Display the effective configuration in TOML format.
///
/// `config` already includes command-line overrides such as `--server`.
pub fn config_show_command(config: &Config) -> Result<()> {
    println!("{BOLD}# Effective config{RESET}");
    println!("{GRAY}# {}{RESET}", config_path()?.display());
    println!();
    print_config_as_toml(config);
    Ok(())
}

/// Update one key in the config file.
pub fn config_set_command(key: &str, value: &str) -> Result<()> {
    let mut config = load_config()?;
    set_config_value(&mut config, key, value)?;
    save_config(&config)?;
    print_success(&format!("Set {} = {}", key, value));
    Ok(())
}

/// Print a Config struct as valid TOML format.
fn print_config_as_toml(config: &Config) {
    for line in config_to_toml_string(config).lines() {
        match line.split_once(" = ") {
            Some((key, value)) => println!("{CYAN}{}{RESET} = {}", key, value),
            None => println!("{}", line),
        }
    }
}

/// Convert a Config to a TOML string.
pub fn config_to_toml_string(config: &Config) -> String {
    format!(
        "server_url = {}\n\
         session_expiry_redirect_ms = {}\n\
         login_redirect_ms = {}\n\
         renderer = {}\n\
         save_diagrams = {}",
        toml_string(&config.server_url),
        config.session_expiry_redirect_ms,
        config.login_redirect_ms,
        toml_string(&config.renderer),
        config.save_diagrams
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_to_toml_produces_valid_toml() {
        let config = Config::default();
        let parsed: Config = toml::from_str(&config_to_toml_string(&config)).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_to_toml_escapes_strings() {
        let config = Config {
            renderer: r"C:\Graphviz\bin\dot.exe".to_string(),
            ..Default::default()
        };
        let parsed: Config = toml::from_str(&config_to_toml_string(&config)).unwrap();
        assert_eq!(parsed.renderer, config.renderer);
    }

    #[test]
    fn test_config_to_toml_includes_all_fields() {
        let config = Config {
            server_url: "https://compiler.example.org".to_string(),
            session_expiry_redirect_ms: 10,
            login_redirect_ms: 20,
            renderer: "neato".to_string(),
            save_diagrams: false,
        };
        let toml_str = config_to_toml_string(&config);

        assert!(toml_str.contains("server_url = \"https://compiler.example.org\""));
        assert!(toml_str.contains("session_expiry_redirect_ms = 10"));
        assert!(toml_str.contains("login_redirect_ms = 20"));
        assert!(toml_str.contains("renderer = \"neato\""));
        assert!(toml_str.contains("save_diagrams = false"));
    }
}
