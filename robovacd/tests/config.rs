use std::{collections::HashMap, path::PathBuf};

use anyhow::Result;
use robovacd::config::{Config, OutputFormat};

fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
    let vars: HashMap<String, String> =
        vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_without_variables() -> Result<()> {
    let cfg = config_from(&[])?;
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.model, None);
    assert_eq!(cfg.log, "info");
    assert_eq!(cfg.output, OutputFormat::Json);
    Ok(())
}

#[test]
fn reads_every_variable() -> Result<()> {
    let cfg = config_from(&[
        ("ROBOVAC_MODEL", "T2278A"),
        ("ROBOVAC_DEVICE_ID", "kitchen-vac"),
        ("ROBOVAC_DEVICE_NAME", "Kitchen"),
        ("ROBOVAC_MODELS_FILE", "/etc/robovac/models.json"),
        ("ROBOVAC_LOG", "robovac_core=debug"),
        ("ROBOVAC_OUTPUT", "Pretty"),
    ])?;
    assert_eq!(cfg.model.as_deref(), Some("T2278A"));
    assert_eq!(cfg.device_id, "kitchen-vac");
    assert_eq!(cfg.device_name, "Kitchen");
    assert_eq!(cfg.models_file, Some(PathBuf::from("/etc/robovac/models.json")));
    assert_eq!(cfg.log, "robovac_core=debug");
    assert_eq!(cfg.output, OutputFormat::Pretty);
    assert_eq!(cfg.output.to_string(), "pretty");
    Ok(())
}

#[test]
fn unknown_output_format_is_an_error() {
    let err = config_from(&[("ROBOVAC_OUTPUT", "yaml")]).unwrap_err();
    assert!(err.to_string().contains("yaml"));
}
