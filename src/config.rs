use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub max_json_payload_size: usize,
    /// When false, service errors are reported with HTTP 200 and an `error` body.
    pub strict_error_status: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_name: String,
    pub revision: String,
    pub tokenizer_name: String,
    pub huggingface_cache_dir: Option<String>,
    pub device: DevicePreference,
    pub max_input_tokens: usize,
    pub max_pending_generations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    Auto,
    Cpu,
    Cuda,
    Metal,
}

impl std::str::FromStr for DevicePreference {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(DevicePreference::Auto),
            "cpu" => Ok(DevicePreference::Cpu),
            "cuda" => Ok(DevicePreference::Cuda),
            "metal" => Ok(DevicePreference::Metal),
            other => Err(anyhow::anyhow!("unknown model device: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                workers: num_cpus::get(),
                max_json_payload_size: 262_144, // 256KB
                strict_error_status: false,
            },
            model: ModelConfig {
                model_name: "humarin/chatgpt_paraphraser_on_T5_base".to_string(),
                revision: "main".to_string(),
                tokenizer_name: "t5-base".to_string(),
                huggingface_cache_dir: None,
                device: DevicePreference::Auto,
                max_input_tokens: 512,
                max_pending_generations: 4,
            },
            security: SecurityConfig {
                allowed_origins: vec!["*".to_string()],
            },
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Config::default();

        // Server configuration
        if let Ok(host) = env::var("HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.server.port = port.parse()?;
        }
        if let Ok(workers) = env::var("WORKERS") {
            config.server.workers = workers.parse()?;
        }
        if let Ok(max_json_payload_size) = env::var("MAX_JSON_PAYLOAD_SIZE") {
            config.server.max_json_payload_size = max_json_payload_size.parse()?;
        }
        if let Ok(strict_error_status) = env::var("STRICT_ERROR_STATUS") {
            config.server.strict_error_status = strict_error_status.parse()?;
        }

        // Model configuration
        if let Ok(model_name) = env::var("MODEL_NAME") {
            config.model.model_name = model_name;
        }
        if let Ok(revision) = env::var("MODEL_REVISION") {
            config.model.revision = revision;
        }
        if let Ok(tokenizer_name) = env::var("TOKENIZER_NAME") {
            config.model.tokenizer_name = tokenizer_name;
        }
        if let Ok(huggingface_cache_dir) = env::var("HUGGINGFACE_CACHE_DIR") {
            config.model.huggingface_cache_dir = Some(huggingface_cache_dir);
        }
        if let Ok(device) = env::var("MODEL_DEVICE") {
            config.model.device = device.parse()?;
        }
        if let Ok(max_input_tokens) = env::var("MAX_INPUT_TOKENS") {
            config.model.max_input_tokens = max_input_tokens.parse()?;
        }
        if let Ok(max_pending_generations) = env::var("MAX_PENDING_GENERATIONS") {
            config.model.max_pending_generations = max_pending_generations.parse()?;
        }

        // Security configuration
        if let Ok(allowed_origins) = env::var("ALLOWED_ORIGINS") {
            config.security.allowed_origins = parse_origins(&allowed_origins);
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.model.max_pending_generations == 0 {
            anyhow::bail!("MAX_PENDING_GENERATIONS must be at least 1");
        }
        if self.model.max_input_tokens == 0 {
            anyhow::bail!("MAX_INPUT_TOKENS must be at least 1");
        }
        if self.server.workers == 0 {
            anyhow::bail!("WORKERS must be at least 1");
        }
        Ok(())
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
