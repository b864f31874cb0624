use anyhow::{Result, anyhow};
use dotenv::dotenv;
use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
    str::FromStr,
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "pretty" => Ok(OutputFormat::Pretty),
            _ => Err(()),
        }
    }
}

impl OutputFormat {
    fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Pretty => "pretty",
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Model string as the device reports it. Required to run.
    pub model: Option<String>,
    pub device_id: String,
    pub device_name: String,
    /// Extra descriptors registered on top of the built-in models.
    pub models_file: Option<PathBuf>,
    pub log: String,
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: None,
            device_id: "robovac".to_string(),
            device_name: "Robot vacuum".to_string(),
            models_file: None,
            log: "info".to_string(),
            output: OutputFormat::Json,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, the environment being the
    /// usual one.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut c = Self::default();
        if let Some(s) = var("ROBOVAC_MODEL") {
            c.model = Some(s);
        }
        if let Some(s) = var("ROBOVAC_DEVICE_ID") {
            c.device_id = s;
        }
        if let Some(s) = var("ROBOVAC_DEVICE_NAME") {
            c.device_name = s;
        }
        if let Some(s) = var("ROBOVAC_MODELS_FILE") {
            c.models_file = Some(PathBuf::from(s));
        }
        if let Some(s) = var("ROBOVAC_LOG") {
            c.log = s;
        }
        if let Some(s) = var("ROBOVAC_OUTPUT") {
            c.output = OutputFormat::from_str(&s)
                .map_err(|_| anyhow!("unsupported output format: {s} (expected json or pretty)"))?;
        }
        Ok(c)
    }
}
