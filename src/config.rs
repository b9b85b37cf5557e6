//! The uptime checker's config file.
//!
//! Key names follow the file format in the wild (`TwilioSID`, `URL`, ...),
//! so existing config files load unchanged.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "TwilioSID")]
    pub twilio_sid: String,
    #[serde(rename = "TwilioAuthToken")]
    pub twilio_auth_token: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "CallFrom")]
    pub call_from: String,
    #[serde(rename = "Phones")]
    pub phones: Vec<String>,
    #[serde(rename = "HipchatAuthToken")]
    pub hipchat_auth_token: String,
    #[serde(rename = "HipchatRoom")]
    pub hipchat_room: String,
}

impl Config {
    /// Parse and validate a JSON config.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let config: Config = serde_json::from_slice(data)
            .context("failed to parse config; is it encrypted or mistyped?")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            bail!("config has no URL to check");
        }
        Ok(())
    }

    /// Chat notifications need both a token and a room.
    pub fn hipchat_enabled(&self) -> bool {
        !self.hipchat_auth_token.is_empty() && !self.hipchat_room.is_empty()
    }
}
