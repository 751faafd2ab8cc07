//! Configuration module
//!
//! Configuration is read once from the environment at process start and then
//! handed to each component. Nothing else in the workspace reads `std::env`.

use std::env;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8080;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 10;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const STORAGE_UPLOAD_TIMEOUT_SECS: u64 = 30;
const CLAMAV_HOST: &str = "127.0.0.1";
const CLAMAV_PORT: u16 = 3310;
const CLAMAV_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REGION: &str = "us-east-1";
const MIN_SECRET_LEN: usize = 32;

/// Settings shared by every HTTP service
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub request_timeout_secs: u64,
    /// HS256 key used to verify session tokens issued by the identity provider
    pub jwt_secret: String,
    pub environment: String,
    pub log_format: Option<String>,
}

/// Submission service configuration
#[derive(Clone, Debug)]
pub struct SubmissionServiceConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // MinIO, LocalStack, ...
    pub local_storage_path: Option<String>,
    pub storage_upload_timeout_secs: u64,
    // Intake
    pub max_upload_size_bytes: usize,
    // ClamAV configuration (scanning is mandatory)
    pub clamav_host: String,
    pub clamav_port: u16,
    pub clamav_timeout_secs: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<SubmissionServiceConfig>);

impl Config {
    fn inner(&self) -> &SubmissionServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = SubmissionServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn log_format(&self) -> Option<&str> {
        self.inner().base.log_format.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.inner().base.request_timeout_secs
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn storage_upload_timeout_secs(&self) -> u64 {
        self.inner().storage_upload_timeout_secs
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().max_upload_size_bytes
    }

    pub fn clamav_host(&self) -> &str {
        &self.inner().clamav_host
    }

    pub fn clamav_port(&self) -> u16 {
        self.inner().clamav_port
    }

    pub fn clamav_timeout_secs(&self) -> u64 {
        self.inner().clamav_timeout_secs
    }
}

/// `MAX_UPLOAD_SIZE_MB` in bytes. Values that do not fit in `usize` are an error.
fn upload_limit_bytes(megabytes: usize) -> Result<usize, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large: {}", megabytes))
}

fn is_production_environment(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

impl SubmissionServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_environment(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let base = BaseConfig {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(REQUEST_TIMEOUT_SECS),
            jwt_secret: env::var("SECRET_KEY")
                .map_err(|_| anyhow::anyhow!("SECRET_KEY must be set for authentication"))?,
            environment,
            log_format: env::var("LOG_FORMAT").ok().map(|s| s.to_lowercase()),
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => Some(value.parse::<StorageBackend>()?),
            Err(_) => None,
        };

        Ok(SubmissionServiceConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok()
                .or_else(|| Some(DEFAULT_REGION.to_string())),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .ok()
                .or_else(|| Some("./storage".to_string())),
            storage_upload_timeout_secs: env::var("STORAGE_UPLOAD_TIMEOUT_SECS")
                .unwrap_or_else(|_| STORAGE_UPLOAD_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(STORAGE_UPLOAD_TIMEOUT_SECS),
            max_upload_size_bytes: upload_limit_bytes(max_upload_size_mb)?,
            clamav_host: env::var("CLAMAV_HOST").unwrap_or_else(|_| CLAMAV_HOST.to_string()),
            clamav_port: env::var("CLAMAV_PORT")
                .unwrap_or_else(|_| CLAMAV_PORT.to_string())
                .parse()
                .unwrap_or(CLAMAV_PORT),
            clamav_timeout_secs: env::var("CLAMAV_TIMEOUT_SECS")
                .unwrap_or_else(|_| CLAMAV_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CLAMAV_TIMEOUT_SECS),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "SECRET_KEY must be at least {} characters long",
                MIN_SECRET_LEN
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.clamav_timeout_secs == 0 || self.storage_upload_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "CLAMAV_TIMEOUT_SECS and STORAGE_UPLOAD_TIMEOUT_SECS must be greater than 0"
            ));
        }

        if self.base.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be greater than 0"));
        }

        match self.storage_backend.unwrap_or(StorageBackend::S3) {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
