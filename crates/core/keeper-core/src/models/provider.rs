use crate::error::{AppError, AppResult};
use crate::policy::validate_provider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const REDACTED: &str = "***REDACTED***";

/// Closed set of storage providers. Unknown keys in a configuration document are a
/// deserialization error.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Local,
    Backblaze,
    AwsS3,
    GoogleDrive,
    GoogleCloudStorage,
    Dropbox,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    FutureDevelopment,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 6] = [
        Self::Local,
        Self::Backblaze,
        Self::AwsS3,
        Self::GoogleDrive,
        Self::GoogleCloudStorage,
        Self::Dropbox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Backblaze => "backblaze",
            Self::AwsS3 => "aws_s3",
            Self::GoogleDrive => "google_drive",
            Self::GoogleCloudStorage => "google_cloud_storage",
            Self::Dropbox => "dropbox",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Local => "Local File System",
            Self::Backblaze => "Backblaze B2",
            Self::AwsS3 => "AWS S3",
            Self::GoogleDrive => "Google Drive",
            Self::GoogleCloudStorage => "Google Cloud Storage",
            Self::Dropbox => "Dropbox",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Local => "Store backups on the local file system or a mounted NAS",
            Self::Backblaze => "Store backups on Backblaze B2 cloud storage",
            Self::AwsS3 => "Store backups in an Amazon S3 bucket",
            Self::GoogleDrive => "Store backups on Google Drive cloud storage",
            Self::GoogleCloudStorage => "Store backups on Google Cloud Storage",
            Self::Dropbox => "Store backups on Dropbox cloud storage",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Local => "hard-drive",
            Self::Backblaze => "cloud",
            Self::AwsS3 => "aws",
            Self::GoogleDrive => "google-drive",
            Self::GoogleCloudStorage => "google",
            Self::Dropbox => "dropbox",
        }
    }

    pub fn availability(&self) -> Availability {
        match self {
            Self::Local | Self::Backblaze | Self::AwsS3 => Availability::Available,
            Self::GoogleDrive | Self::GoogleCloudStorage | Self::Dropbox => {
                Availability::FutureDevelopment
            }
        }
    }

    pub fn container_type(&self) -> &'static str {
        match self {
            Self::Local => "directory",
            Self::Backblaze | Self::AwsS3 | Self::GoogleCloudStorage => "bucket",
            Self::GoogleDrive | Self::Dropbox => "folder",
        }
    }

    pub fn default_container(&self) -> &'static str {
        match self {
            Self::Local => "/var/backups/keeper",
            Self::Backblaze | Self::AwsS3 | Self::GoogleCloudStorage => "keeper-backups",
            Self::GoogleDrive => "Keeper Backups",
            Self::Dropbox => "/keeper-backups",
        }
    }

    /// Credential fields an enabled provider must have filled in.
    pub fn required_credentials(&self) -> &'static [&'static str] {
        match self {
            Self::Local | Self::Dropbox => &[],
            Self::Backblaze => &["application_key_id", "application_key"],
            Self::AwsS3 => &["access_key", "secret_key"],
            Self::GoogleDrive => &["credentials_file"],
            Self::GoogleCloudStorage => &["credentials_file", "project_id"],
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::UnknownProvider(s.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct CloudProviderConfig {
    pub enabled: bool,
    pub container: String,
    pub container_type: String,

    // local
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    // backblaze
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_key: Option<String>,
    // aws_s3
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    // google
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    // legacy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<f64>,
    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Bytes per second, `None` means unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bandwidth: Option<u64>,
    /// Bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_chunk_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_pool_size: Option<u32>,
    pub encryption_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_salt: Option<String>,
}

/// Field-level overlay for one provider entry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ProviderPatch {
    pub enabled: Option<bool>,
    pub container: Option<String>,
    pub path: Option<String>,
    pub application_key_id: Option<String>,
    pub application_key: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub credentials_file: Option<String>,
    pub token_file: Option<String>,
    pub folder_id: Option<String>,
    pub project_id: Option<String>,
    pub bucket_name: Option<String>,
    pub region: Option<String>,
    pub max_retries: Option<u32>,
    pub retry_delay: Option<f64>,
    pub timeout: Option<u64>,
    pub max_bandwidth: Option<u64>,
    pub upload_chunk_size: Option<u64>,
    pub connection_pool_size: Option<u32>,
    pub encryption_enabled: Option<bool>,
    pub encryption_key: Option<String>,
    pub encryption_salt: Option<String>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl CloudProviderConfig {
    /// Default entry for a provider, disabled.
    pub fn defaults_for(kind: ProviderKind) -> Self {
        let mut config = Self {
            container: kind.default_container().to_string(),
            container_type: kind.container_type().to_string(),
            ..Default::default()
        };
        match kind {
            ProviderKind::Local => {
                config.path = Some(kind.default_container().to_string());
            }
            ProviderKind::Backblaze | ProviderKind::AwsS3 => {
                config.region = Some(
                    if kind == ProviderKind::Backblaze {
                        "us-west-000"
                    } else {
                        "us-east-1"
                    }
                    .to_string(),
                );
                config.max_retries = Some(3);
                config.retry_delay = Some(1.0);
                config.timeout = Some(300);
                config.upload_chunk_size = Some(100 * 1024 * 1024);
                config.connection_pool_size = Some(5);
            }
            ProviderKind::GoogleDrive => {
                config.credentials_file = Some("credentials.json".to_string());
                config.token_file = Some("token.json".to_string());
                config.max_retries = Some(3);
                config.retry_delay = Some(1.0);
                config.timeout = Some(300);
            }
            ProviderKind::GoogleCloudStorage => {
                config.bucket_name = Some(kind.default_container().to_string());
                config.max_retries = Some(3);
                config.retry_delay = Some(1.0);
                config.timeout = Some(300);
            }
            ProviderKind::Dropbox => {}
        }
        config
    }

    pub fn credential(&self, field: &str) -> Option<&str> {
        match field {
            "path" => self.path.as_deref(),
            "application_key_id" => self.application_key_id.as_deref(),
            "application_key" => self.application_key.as_deref(),
            "access_key" => self.access_key.as_deref(),
            "secret_key" => self.secret_key.as_deref(),
            "credentials_file" => self.credentials_file.as_deref(),
            "project_id" => self.project_id.as_deref(),
            _ => None,
        }
    }

    /// Credential fields required for `kind` that are missing or blank.
    pub fn missing_credentials(&self, kind: ProviderKind) -> Vec<&'static str> {
        kind.required_credentials()
            .iter()
            .copied()
            .filter(|field| {
                self.credential(field)
                    .is_none_or(|value| value.trim().is_empty())
            })
            .collect()
    }

    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        match kind {
            ProviderKind::Local => present(&self.path) || !self.container.trim().is_empty(),
            ProviderKind::Dropbox => !self.container.trim().is_empty(),
            _ => self.missing_credentials(kind).is_empty(),
        }
    }

    /// Copy with secrets replaced by [`REDACTED`].
    pub fn redacted(&self) -> Self {
        fn mask(value: &Option<String>) -> Option<String> {
            if present(value) {
                Some(REDACTED.to_string())
            } else {
                value.clone()
            }
        }

        Self {
            password: mask(&self.password),
            application_key: mask(&self.application_key),
            secret_key: mask(&self.secret_key),
            encryption_key: mask(&self.encryption_key),
            encryption_salt: mask(&self.encryption_salt),
            ..self.clone()
        }
    }

    /// Overlays `patch` onto a copy of this entry and validates the result for `kind`.
    pub fn apply(&self, kind: ProviderKind, patch: ProviderPatch) -> AppResult<Self> {
        let mut next = self.clone();
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field {
                    next.$field = value;
                })*
            };
        }
        macro_rules! overlay_opt {
            ($($field:ident),* $(,)?) => {
                $(if patch.$field.is_some() {
                    next.$field = patch.$field;
                })*
            };
        }
        overlay!(enabled, container, encryption_enabled);
        overlay_opt!(
            path,
            application_key_id,
            application_key,
            access_key,
            secret_key,
            credentials_file,
            token_file,
            folder_id,
            project_id,
            bucket_name,
            region,
            max_retries,
            retry_delay,
            timeout,
            max_bandwidth,
            upload_chunk_size,
            connection_pool_size,
            encryption_key,
            encryption_salt,
        );
        next.container_type = kind.container_type().to_string();

        let report = validate_provider(kind, &next);
        if !report.is_valid {
            return Err(AppError::Validation(report.errors));
        }
        Ok(next)
    }
}

/// Entry of the provider status list rendered by the selection UI.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderStatus {
    pub name: ProviderKind,
    pub enabled: bool,
    pub available: bool,
    pub configured: bool,
    pub display_name: String,
    pub description: String,
    pub icon: String,
}

impl ProviderStatus {
    pub fn new(kind: ProviderKind, config: Option<&CloudProviderConfig>) -> Self {
        Self {
            name: kind,
            enabled: config.is_some_and(|c| c.enabled),
            available: kind.availability() == Availability::Available,
            configured: config.is_some_and(|c| c.is_configured(kind)),
            display_name: kind.display_name().to_string(),
            description: kind.description().to_string(),
            icon: kind.icon().to_string(),
        }
    }
}
