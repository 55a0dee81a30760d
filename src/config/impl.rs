use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 常用环境变量到配置项的映射
const ENV_OVERRIDES: [(&str, &str); 8] = [
    ("app.environment", "APP_ENV"),
    ("app.log_level", "RUST_LOG"),
    ("server.host", "SERVER_HOST"),
    ("server.port", "SERVER_PORT"),
    ("server.unix_socket_path", "UNIX_SOCKET"),
    ("server.workers", "CPU_COUNT"),
    ("jwt.secret", "JWT_SECRET"),
    ("database.url", "DATABASE_URL"),
];

fn invalid(message: &str) -> ConfigError {
    ConfigError::Message(message.to_string())
}

impl AppConfig {
    /// 加载配置：config.toml -> config.{APP_ENV}.toml -> HOTQUESTION_* -> 常用环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{env_name}")).required(false))
            .add_source(
                Environment::with_prefix("HOTQUESTION")
                    .separator("_")
                    .try_parsing(true),
            );

        for (key, var) in ENV_OVERRIDES {
            builder = builder.set_override_option(key, std::env::var(var).ok())?;
        }

        Self::from_builder(builder)
    }

    /// 从已组装的配置源构建并校验
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        // workers = 0 表示按 CPU 数自动选择
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers).max(1);
        }

        app_config.validate()?;
        Ok(app_config)
    }

    /// 拒绝会让服务在运行时出错的配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(invalid("jwt.secret must be set (JWT_SECRET)"));
        }
        if self.jwt.access_token_expiry <= 0 || self.jwt.refresh_token_expiry <= 0 {
            return Err(invalid("jwt token expiry must be positive"));
        }

        let hq = &self.hotquestion;
        if hq.max_question_length == 0 || hq.max_comment_length == 0 {
            return Err(invalid("hotquestion length limits must be positive"));
        }
        if hq.export_max_rows == 0 {
            return Err(invalid("hotquestion.export_max_rows must be positive"));
        }
        if !(1..=100).contains(&hq.default_page_size) {
            return Err(invalid("hotquestion.default_page_size must be within 1..=100"));
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| invalid("Configuration already initialized"))?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Unix 套接字路径，未配置时为 None
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{FileFormat, Value};

    const EXAMPLE: &str = include_str!("../../config.example.toml");

    fn example_with(overrides: Vec<(&str, Value)>) -> Result<AppConfig, ConfigError> {
        let mut builder = Config::builder().add_source(File::from_str(EXAMPLE, FileFormat::Toml));
        for (key, value) in overrides {
            builder = builder.set_override(key, value)?;
        }
        AppConfig::from_builder(builder)
    }

    #[test]
    fn test_example_config_loads() {
        let config = example_with(vec![]).expect("example config");
        assert_eq!(config.hotquestion.default_page_size, 20);
        assert!(config.server.workers >= 1);
        assert!(config.is_development());
        assert_eq!(config.server_bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(example_with(vec![("jwt.secret", "".into())]).is_err());
    }

    #[test]
    fn test_hotquestion_limits_checked() {
        assert!(example_with(vec![("hotquestion.default_page_size", 0i64.into())]).is_err());
        assert!(example_with(vec![("hotquestion.default_page_size", 500i64.into())]).is_err());
        assert!(example_with(vec![("hotquestion.export_max_rows", 0i64.into())]).is_err());
        assert!(example_with(vec![("hotquestion.max_question_length", 0i64.into())]).is_err());
    }
}
