use serde::Deserialize;
use std::fs;
use std::path::Path;
use crate::Result;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(rename = "Endpoint")]
    pub endpoint: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "DavRoot")]
    pub dav_root: Option<String>,
    #[serde(rename = "Logfile")]
    pub logfile: Option<String>,
    #[serde(rename = "Loglevel")]
    pub loglevel: Option<String>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn dav_root(&self) -> &str {
        self.dav_root.as_deref().unwrap_or("remote.php/dav")
    }

    pub fn loglevel(&self) -> &str {
        self.loglevel.as_deref().unwrap_or("info")
    }
}
