use aliyun_rds_client::Credentials;
use eyre::{
    eyre,
    Result,
};
use serde::Deserialize;

/// Credential section as it appears in the config file. Every field is optional here so that a missing value can be
/// reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawCredential {
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub access_key_secret: Option<String>,
    #[serde(default)]
    pub region_id: Option<String>,
}

impl TryFrom<RawCredential> for Credentials {
    type Error = eyre::Report;

    /// Both absent and blank values are rejected.
    fn try_from(raw: RawCredential) -> Result<Self> {
        let missing = [
            ("access_key_id", &raw.access_key_id),
            ("access_key_secret", &raw.access_key_secret),
            ("region_id", &raw.region_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(eyre!(
                "Credential in config file not fully configured, missing: {}",
                missing.join(", ")
            ));
        }

        Ok(Self {
            access_key_id: raw.access_key_id.unwrap_or_default(),
            access_key_secret: raw.access_key_secret.unwrap_or_default(),
            region_id: raw.region_id.unwrap_or_default(),
        })
    }
}
