#[cfg(feature = "lambda")]
use crate::core::{ConfigProvider, Storage};
#[cfg(feature = "lambda")]
use crate::utils::error::{EtlError, Result};
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use std::env;

#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    /// S3 key of the uploaded table.
    pub source_key: String,
    pub column: String,
    pub delimiter: char,
    pub has_headers: bool,
    pub s3_bucket: String,
    /// Key prefix the output artifacts are written under.
    pub s3_prefix: String,
    pub s3_region: String,
    pub bundle: bool,
}

#[cfg(feature = "lambda")]
impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            source_key: env::var("SOURCE_KEY").map_err(|_| EtlError::MissingConfigError {
                field: "SOURCE_KEY".to_string(),
            })?,
            column: env::var("COLUMN").unwrap_or_else(|_| "email".to_string()),
            delimiter: env::var("DELIMITER")
                .ok()
                .and_then(|d| d.chars().next())
                .unwrap_or(','),
            has_headers: env::var("HAS_HEADERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            s3_bucket: env::var("S3_BUCKET").map_err(|_| EtlError::MissingConfigError {
                field: "S3_BUCKET".to_string(),
            })?,
            s3_prefix: env::var("S3_PREFIX").unwrap_or_else(|_| "maillist-output".to_string()),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "eu-south-1".to_string()),
            bundle: env::var("BUNDLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        })
    }
}

#[cfg(feature = "lambda")]
impl ConfigProvider for LambdaConfig {
    fn source(&self) -> &str {
        &self.source_key
    }

    fn column(&self) -> &str {
        &self.column
    }

    fn delimiter(&self) -> u8 {
        self.delimiter as u8
    }

    fn has_headers(&self) -> bool {
        self.has_headers
    }

    fn output_path(&self) -> &str {
        &self.s3_prefix
    }

    fn bundle_output(&self) -> bool {
        self.bundle
    }

    fn max_rows(&self) -> Option<usize> {
        None
    }
}

#[cfg(feature = "lambda")]
impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_non_empty_string("SOURCE_KEY", &self.source_key)?;
        validate_non_empty_string("COLUMN", &self.column)?;
        validate_delimiter("DELIMITER", self.delimiter)?;
        validate_s3_bucket_name("S3_BUCKET", &self.s3_bucket)?;
        validate_non_empty_string("S3_PREFIX", &self.s3_prefix)?;
        validate_aws_region("S3_REGION", &self.s3_region)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

#[cfg(feature = "lambda")]
fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    if bucket_name.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name cannot be empty".to_string(),
        });
    }

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name must be between 3 and 63 characters".to_string(),
        });
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots"
                .to_string(),
        });
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name cannot start or end with a hyphen".to_string(),
        });
    }

    Ok(())
}

#[cfg(feature = "lambda")]
fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    crate::utils::validation::validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

#[cfg(feature = "lambda")]
impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[cfg(feature = "lambda")]
impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| EtlError::ProcessingError {
                message: format!("Failed to read s3://{}/{}: {}", self.bucket, path, e),
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| EtlError::ProcessingError {
                message: format!("Failed to collect S3 object body: {}", e),
            })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| EtlError::ProcessingError {
                message: format!("Failed to write s3://{}/{}: {}", self.bucket, path, e),
            })?;

        Ok(())
    }
}
