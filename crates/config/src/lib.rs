use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

pub use config::ConfigError;

/// Default cross-origin allow-list: the local dev servers of the web client.
const DEFAULT_ORIGINS: [&str; 6] = [
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:5174",
    "http://127.0.0.1:5174",
    "http://localhost:5175",
    "http://127.0.0.1:5175",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub cors: CorsSettings,
    pub transcripts: TranscriptSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    /// Upper bound for a single inbound WebSocket message. Media items travel
    /// inline as data URLs, hence the generous default.
    pub max_message_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSettings {
    /// Directory holding one `<roomId>-<endedAt>.json` file per ended meeting.
    pub dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset.
    pub filter: String,
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                host: "0.0.0.0".to_string(),
                port: 3001,
                max_message_size: 50 * 1024 * 1024,
            },
            cors: CorsSettings {
                allowed_origins: DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
            },
            transcripts: TranscriptSettings {
                dir: "transcripts".to_string(),
            },
            logging: LoggingSettings {
                filter: "info".to_string(),
                json: false,
            },
        }
    }
}

impl Settings {
    /// Loads settings from built-in defaults, optional `config/default.toml`
    /// and `config/local.toml`, then `HUDDLE__*` environment variables.
    /// A bare `PORT` variable wins over everything else for `app.port`.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("HUDDLE")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .set_override_option("app.port", std::env::var("PORT").ok())?
            .build()?
            .try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}
