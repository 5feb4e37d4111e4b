//! Command-line arguments

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::CliError;
use crate::state::AppAction;

/// Parameter file used when `--params` is not given
pub const DEFAULT_PARAMS: &str = "params/tablet_holder.json";

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG: &str = "jig.ron";

/// Rebuild a parametric assembly, show its item tree and export it
#[derive(Debug, Parser)]
#[command(name = "jig", version, about, long_about = None)]
pub struct Cli {
    /// Parameter record (JSON object of name to number)
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Application configuration (RON)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Change a parameter and rebuild; may be repeated
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, f64)>,

    /// Hide a top-level item; may be repeated
    #[arg(long = "hide", value_name = "LABEL")]
    pub hide: Vec<String>,

    /// Write one STL per part into this directory
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Print the assembly's parameters and exit
    #[arg(long)]
    pub list_params: bool,
}

impl Cli {
    /// Parameter file to load
    pub fn params_path(&self) -> Result<PathBuf, CliError> {
        match &self.params {
            Some(path) => Ok(path.clone()),
            None if Path::new(DEFAULT_PARAMS).exists() => Ok(PathBuf::from(DEFAULT_PARAMS)),
            None => Err(CliError::NoParams(PathBuf::from(DEFAULT_PARAMS))),
        }
    }

    /// Actions requested on the command line, in processing order
    ///
    /// The initial rebuild comes first, then each parameter edit, then
    /// visibility changes, then export.
    pub fn actions(&self) -> Vec<AppAction> {
        let mut actions = vec![AppAction::Rebuild];
        actions.extend(self.set.iter().map(|(key, value)| AppAction::SetParameter {
            key: key.clone(),
            value: *value,
        }));
        actions.extend(self.hide.iter().map(|label| AppAction::SetVisibility {
            label: label.clone(),
            visible: false,
        }));
        if let Some(dir) = &self.export {
            actions.push(AppAction::Export(dir.clone()));
        }
        actions
    }
}

fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{}'", s));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for '{}': {}", key, e))?;
    if !value.is_finite() {
        return Err(format!("value for '{}' must be finite", key));
    }
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("wall=9").unwrap(), ("wall".to_string(), 9.0));
        assert_eq!(
            parse_assignment(" visor_angle = 12.5 ").unwrap(),
            ("visor_angle".to_string(), 12.5)
        );
        assert!(parse_assignment("wall").is_err());
        assert!(parse_assignment("=3").is_err());
        assert!(parse_assignment("wall=thick").is_err());
        assert!(parse_assignment("wall=inf").is_err());
    }

    #[test]
    fn test_actions_order() {
        let cli = Cli::parse_from([
            "jig",
            "--hide",
            "Right Half",
            "--set",
            "wall=9",
            "--set",
            "visor_d=60",
            "--export",
            "out",
        ]);
        let actions = cli.actions();
        assert!(matches!(actions[0], AppAction::Rebuild));
        assert!(matches!(&actions[1], AppAction::SetParameter { key, .. } if key == "wall"));
        assert!(matches!(&actions[2], AppAction::SetParameter { key, .. } if key == "visor_d"));
        assert!(matches!(&actions[3], AppAction::SetVisibility { label, visible: false } if label == "Right Half"));
        assert!(matches!(&actions[4], AppAction::Export(dir) if dir == Path::new("out")));
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG));
    }

    #[test]
    fn test_explicit_params_path() {
        let cli = Cli::parse_from(["jig", "--params", "mine.json"]);
        assert_eq!(cli.params_path().unwrap(), PathBuf::from("mine.json"));
    }
}
