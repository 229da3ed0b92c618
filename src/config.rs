use std::env;

/// `DATABASE_URL` value that selects the in-process store.
pub const MEMORY_STORE_URL: &str = "memory://";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|v| split_origins(&v))
                .unwrap_or_default(),

            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_ttl_secs: env::var("JWT_TTL_SECS")
                .unwrap_or_else(|_| "1800".into()) // 30 minutes
                .parse()
                .expect("JWT_TTL_SECS must be a number"),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_STORE_URL
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
