use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

const DEFAULT_FLOWISE_API_URL: &str = "https://cloud.flowiseai.com";
const DEFAULT_CHATFLOW_ID: &str = "4dae3805-7563-48ff-82d8-bf4f866ac51f";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeBaseUploadMode {
    Disabled,
    /// Raw file as a multipart part on the vector upsert endpoint.
    Multipart,
    /// Base64 data URI inside a prediction request's `overrideConfig`.
    Base64,
}

impl FromStr for KnowledgeBaseUploadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disabled" | "off" | "none" => Ok(KnowledgeBaseUploadMode::Disabled),
            "multipart" => Ok(KnowledgeBaseUploadMode::Multipart),
            "base64" => Ok(KnowledgeBaseUploadMode::Base64),
            other => Err(format!("unknown upload mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub max_attempts: u32,
    pub backoff_base: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            backoff_base: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlowiseConfig {
    pub api_url: Url,
    pub chatflow_id: String,
    pub api_key: Option<String>,
    pub upload_mode: KnowledgeBaseUploadMode,
    pub http: HttpClientConfig,
}

impl FlowiseConfig {
    pub fn prediction_url(&self) -> String {
        self.endpoint(&format!("api/v1/prediction/{}", self.chatflow_id))
    }

    pub fn vector_upsert_url(&self) -> String {
        self.endpoint(&format!("api/v1/vector/upsert/{}", self.chatflow_id))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.as_str().trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingsConfig {
    pub service_url: Url,
    pub api_key: Option<String>,
    pub http: HttpClientConfig,
}

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    /// Words per chunk window.
    pub chunk_size: usize,
    /// Words shared by consecutive windows.
    pub chunk_overlap: usize,
    pub worker_count: usize,
    pub queue_capacity: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 200,
            chunk_overlap: 40,
            worker_count: 3,
            queue_capacity: 64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub database_pool_size: u32,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub processing: ProcessingConfig,
    pub flowise: FlowiseConfig,
    pub embeddings: Option<EmbeddingsConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let http = HttpClientConfig {
            timeout: Duration::from_secs(parse_or(&get, "HTTP_TIMEOUT_SECS", 30u64)?),
            max_attempts: parse_or(&get, "HTTP_MAX_ATTEMPTS", 3u32)?.max(1),
            backoff_base: Duration::from_millis(parse_or(&get, "HTTP_RETRY_BACKOFF_MS", 500u64)?),
        };

        let processing = ProcessingConfig {
            chunk_size: parse_or(&get, "CHUNK_SIZE", 200usize)?,
            chunk_overlap: parse_or(&get, "CHUNK_OVERLAP", 40usize)?,
            worker_count: parse_or(&get, "WORKER_COUNT", 3usize)?.max(1),
            queue_capacity: parse_or(&get, "JOB_QUEUE_CAPACITY", 64usize)?.max(1),
        };

        if processing.chunk_size == 0 {
            return Err(invalid("CHUNK_SIZE", "must be greater than zero"));
        }
        if processing.chunk_overlap >= processing.chunk_size {
            return Err(invalid(
                "CHUNK_OVERLAP",
                "must be smaller than CHUNK_SIZE",
            ));
        }

        let flowise = FlowiseConfig {
            api_url: parse_url(
                "FLOWISE_API_URL",
                &get("FLOWISE_API_URL").unwrap_or_else(|| DEFAULT_FLOWISE_API_URL.to_string()),
            )?,
            chatflow_id: get("FLOWISE_CHATFLOW_ID")
                .unwrap_or_else(|| DEFAULT_CHATFLOW_ID.to_string()),
            api_key: get("FLOWISE_API_KEY"),
            upload_mode: parse_or(
                &get,
                "FLOWISE_UPLOAD_MODE",
                KnowledgeBaseUploadMode::Disabled,
            )?,
            http: http.clone(),
        };

        let embeddings = match get("EMBEDDINGS_SERVICE_URL") {
            Some(raw) => Some(EmbeddingsConfig {
                service_url: parse_url("EMBEDDINGS_SERVICE_URL", &raw)?,
                api_key: get("EMBEDDINGS_API_KEY"),
                http,
            }),
            None => None,
        };

        Ok(Self {
            port: parse_or(&get, "PORT", 3000u16)?,
            database_url: get("DATABASE_URL"),
            database_pool_size: parse_or(&get, "DATABASE_POOL_SIZE", 10u32)?.max(1),
            upload_dir: PathBuf::from(get("UPLOAD_DIR").unwrap_or_else(|| "./uploads".to_string())),
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024usize)?,
            processing,
            flowise,
            embeddings,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| invalid(key, &e.to_string())),
        None => Ok(default),
    }
}

fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| invalid(key, &e.to_string()))
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.database_url.is_none());
        assert!(config.embeddings.is_none());
        assert_eq!(config.flowise.upload_mode, KnowledgeBaseUploadMode::Disabled);
        assert_eq!(config.flowise.http.timeout, Duration::from_secs(30));
        assert_eq!(config.flowise.http.max_attempts, 3);
    }

    #[test]
    fn test_prediction_url_joins_without_double_slash() {
        let config = config_from(&[
            ("FLOWISE_API_URL", "http://localhost:3001/"),
            ("FLOWISE_CHATFLOW_ID", "flow-1"),
        ])
        .unwrap();

        assert_eq!(
            config.flowise.prediction_url(),
            "http://localhost:3001/api/v1/prediction/flow-1"
        );
        assert_eq!(
            config.flowise.vector_upsert_url(),
            "http://localhost:3001/api/v1/vector/upsert/flow-1"
        );
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk() {
        let result = config_from(&[("CHUNK_SIZE", "50"), ("CHUNK_OVERLAP", "50")]);
        assert!(matches!(result, Err(ConfigError::InvalidValue { key, .. }) if key == "CHUNK_OVERLAP"));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let result = config_from(&[("PORT", "eighty")]);
        assert!(matches!(result, Err(ConfigError::InvalidValue { key, .. }) if key == "PORT"));
    }

    #[test]
    fn test_embeddings_enabled_by_url() {
        let config = config_from(&[
            ("EMBEDDINGS_SERVICE_URL", "http://embeddings.local/embed"),
            ("EMBEDDINGS_API_KEY", "secret"),
        ])
        .unwrap();

        let embeddings = config.embeddings.unwrap();
        assert_eq!(embeddings.service_url.as_str(), "http://embeddings.local/embed");
        assert_eq!(embeddings.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("DATABASE_URL", "  "), ("FLOWISE_UPLOAD_MODE", "multipart")])
            .unwrap();

        assert!(config.database_url.is_none());
        assert_eq!(config.flowise.upload_mode, KnowledgeBaseUploadMode::Multipart);
    }
}
