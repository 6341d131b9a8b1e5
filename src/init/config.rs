use std::path::PathBuf;

use anyhow::anyhow;

pub struct DbConfig {
    db_host: String,
    db_port: Option<u16>,
    db_username: String,
    db_password: String,
    db_name: String,
}

impl DbConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let is_socket_path = lookup("DB_HOST").is_some_and(|host| host.starts_with('/'));

        if !is_socket_path && let Some(db_url) = lookup("DB_URL") {
            return Self::from_url(&db_url);
        }

        let require = |key: &str| {
            lookup(key).ok_or_else(|| anyhow!("Environment variable {key} not found"))
        };

        let db_host = require("DB_HOST")?;
        let db_port = if db_host.starts_with('/') {
            None
        } else {
            Some(require("DB_PORT")?.parse::<u16>()?)
        };

        Ok(DbConfig {
            db_host,
            db_port,
            db_username: require("DB_USERNAME")?,
            db_password: require("DB_PASSWORD")?,
            db_name: require("DB_NAME")?,
        })
    }

    pub fn from_url(url: &str) -> anyhow::Result<Self> {
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| anyhow!("Invalid URL format"))?;

        match scheme.trim().to_lowercase().as_ref() {
            "postgres" | "psql" | "postgresql" | "pg" => (),
            _ => return Err(anyhow!("Unsupported DB; only PostgreSQL is supported")),
        }

        let (credentials, host_and_path) = rest
            .rsplit_once('@')
            .ok_or_else(|| anyhow!("Missing credentials or host"))?;
        let (db_username, db_password) = credentials
            .split_once(':')
            .unwrap_or((credentials, ""));

        let (host_and_port, db_name) = host_and_path
            .split_once('/')
            .unwrap_or((host_and_path, ""));
        let (db_host, db_port) = match host_and_port.split_once(':') {
            Some((host, port)) => (host, Some(port.parse::<u16>()?)),
            None => (host_and_port, Some(5432)),
        };
        if db_host.is_empty() {
            return Err(anyhow!("Missing host"));
        }

        Ok(DbConfig {
            db_host: db_host.to_owned(),
            db_port,
            db_username: db_username.to_owned(),
            db_password: db_password.to_owned(),
            db_name: db_name.to_owned(),
        })
    }

    pub fn to_url(&self) -> String {
        if self.db_host.starts_with('/') {
            return format!(
                "postgres://{user}:{pw}@/{db}?host={host}",
                user = self.db_username,
                pw = self.db_password,
                db = self.db_name,
                host = self.db_host
            );
        }

        format!(
            "postgres://{user}:{pw}@{host}{port}/{db}",
            user = self.db_username,
            pw = self.db_password,
            host = self.db_host,
            port = match self.db_port {
                Some(port) => format!(":{port}"),
                None => String::new(),
            },
            db = self.db_name
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Everything the server reads from the environment besides the database.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub static_dir: PathBuf,
    pub cookie_secure: bool,
    pub log_dir: Option<PathBuf>,
    pub log_format: LogFormat,
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let secret_key = lookup("SECRET_KEY")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow!("Environment variable SECRET_KEY not found"))?;

        let port = match lookup("PORT") {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow!("PORT is not a valid port: {e}"))?,
            None => 8000,
        };

        let access_token_expire_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(m) => {
                let minutes = m
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| anyhow!("ACCESS_TOKEN_EXPIRE_MINUTES is not a number: {e}"))?;
                if minutes <= 0 {
                    return Err(anyhow!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive"));
                }
                minutes
            }
            None => 30,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(AppConfig {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port,
            secret_key,
            access_token_expire_minutes,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
            cookie_secure: lookup("COOKIE_SECURE").as_deref().is_some_and(parse_bool),
            log_dir: lookup("LOG_DIR")
                .filter(|d| !d.trim().is_empty())
                .map(PathBuf::from),
            log_format,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_expire_minutes)
    }
}
