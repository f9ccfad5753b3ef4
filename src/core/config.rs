use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub sso: SsoConfig,
    pub llm: LlmConfig,
    pub rag: RagConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_size_mb: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// SSO endpoint used to confirm bearer tokens
#[derive(Debug, Clone)]
pub struct SsoConfig {
    pub base_url: String,
    pub verify_token_endpoint: String,
    /// How long a resolved user id is trusted without asking the SSO again
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
}

/// Chat completion API (DeepSeek, OpenAI-compatible)
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct RagConfig {
    /// Global character budget for document text injected into one prompt
    pub context_max_length: usize,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                tracing::warn!("Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            sso: SsoConfig::from_env()?,
            llm: LlmConfig::from_env()?,
            rag: RagConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 10;

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_UPLOAD_SIZE_MB must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_upload_size_mb,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl SsoConfig {
    const DEFAULT_VERIFY_TOKEN_ENDPOINT: &'static str = "/api/auth/verify-token/";
    const DEFAULT_CACHE_TTL_SECS: u64 = 60;
    const DEFAULT_TIMEOUT_SECS: u64 = 5;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("SSO_BASE_URL")
            .map_err(|_| "SSO_BASE_URL environment variable is required".to_string())?
            .trim_end_matches('/')
            .to_string();

        let verify_token_endpoint = env::var("SSO_VERIFY_TOKEN_ENDPOINT")
            .unwrap_or_else(|_| Self::DEFAULT_VERIFY_TOKEN_ENDPOINT.to_string());

        let cache_ttl_secs = env::var("SSO_CACHE_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_CACHE_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SSO_CACHE_TTL_SECS must be a valid number".to_string())?;

        let timeout_secs = env::var("SSO_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SSO_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            base_url,
            verify_token_endpoint,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn verify_url(&self) -> String {
        format!("{}{}", self.base_url, self.verify_token_endpoint)
    }
}

impl LlmConfig {
    const DEFAULT_API_URL: &'static str = "https://api.deepseek.com/v1/chat/completions";
    const DEFAULT_MODEL: &'static str = "deepseek-chat";
    // Model responses can be slow, so the default is generous
    const DEFAULT_TIMEOUT_SECS: u64 = 120;
    const DEFAULT_TEMPERATURE: f32 = 0.7;
    const DEFAULT_MAX_TOKENS: u32 = 8000;

    pub fn from_env() -> Result<Self, String> {
        let api_url =
            env::var("DEEPSEEK_API_URL").unwrap_or_else(|_| Self::DEFAULT_API_URL.to_string());

        let api_key = env::var("DEEPSEEK_API_KEY")
            .map_err(|_| "DEEPSEEK_API_KEY environment variable is required".to_string())?;

        let model = env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string());

        let timeout_secs = env::var("DEEPSEEK_TIMEOUT")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DEEPSEEK_TIMEOUT must be a valid number".to_string())?;

        let temperature = env::var("DEEPSEEK_TEMPERATURE")
            .unwrap_or_else(|_| Self::DEFAULT_TEMPERATURE.to_string())
            .parse::<f32>()
            .map_err(|_| "DEEPSEEK_TEMPERATURE must be a valid number".to_string())?;

        let max_tokens = env::var("DEEPSEEK_MAX_TOKENS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_TOKENS.to_string())
            .parse::<u32>()
            .map_err(|_| "DEEPSEEK_MAX_TOKENS must be a valid number".to_string())?;

        Ok(Self {
            api_url,
            api_key,
            model,
            timeout: Duration::from_secs(timeout_secs),
            temperature,
            max_tokens,
        })
    }
}

impl RagConfig {
    const DEFAULT_CONTEXT_MAX_LENGTH: usize = 50_000;

    pub fn from_env() -> Result<Self, String> {
        let context_max_length = env::var("DOCUMENT_CONTEXT_MAX_LENGTH")
            .unwrap_or_else(|_| Self::DEFAULT_CONTEXT_MAX_LENGTH.to_string())
            .parse::<usize>()
            .map_err(|_| "DOCUMENT_CONTEXT_MAX_LENGTH must be a valid number".to_string())?;

        if context_max_length == 0 {
            return Err("DOCUMENT_CONTEXT_MAX_LENGTH must be greater than zero".to_string());
        }

        Ok(Self { context_max_length })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "NOC RAG API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Document-grounded chat API: upload PDF, DOCX, TXT or XLSX documents and ask questions about them"
                .to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
