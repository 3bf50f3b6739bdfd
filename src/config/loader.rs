//! Load [`ServerConfig`] from environment variables (call `dotenvy::dotenv()` first to honor `.env`).

use crate::config::ServerConfig;
use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

/// Read `DATABASE_URL`, `SEED_DIR`, `HOST`, `PORT`, `MAX_PAGE_SIZE`, `BODY_LIMIT_BYTES`
/// and `RATE_LIMIT_PER_MINUTE`.
pub fn from_env() -> Result<ServerConfig, ConfigError> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Same as [`from_env`] with an injectable variable source. Unset keys keep their defaults.
pub fn from_lookup<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ServerConfig::default();
    if let Some(v) = lookup("DATABASE_URL") {
        config.database_url = v;
    }
    if let Some(v) = lookup("SEED_DIR") {
        config.seed_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("HOST") {
        config.host = v;
    }
    if let Some(v) = lookup("PORT") {
        config.port = parse("PORT", v)?;
    }
    if let Some(v) = lookup("MAX_PAGE_SIZE") {
        config.max_page_size = parse("MAX_PAGE_SIZE", v)?;
        if config.max_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MAX_PAGE_SIZE",
                value: "0".into(),
            });
        }
    }
    if let Some(v) = lookup("BODY_LIMIT_BYTES") {
        config.body_limit_bytes = parse("BODY_LIMIT_BYTES", v)?;
    }
    if let Some(v) = lookup("RATE_LIMIT_PER_MINUTE") {
        config.rate_limit_per_minute = parse("RATE_LIMIT_PER_MINUTE", v)?;
    }
    Ok(config)
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn unset_keys_keep_defaults() {
        assert_eq!(from_lookup(lookup(&[])).unwrap(), ServerConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let c = from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite://other.db"),
            ("SEED_DIR", "seeds"),
            ("PORT", "8080"),
            ("MAX_PAGE_SIZE", "250"),
            ("RATE_LIMIT_PER_MINUTE", "0"),
        ]))
        .unwrap();
        assert_eq!(c.database_url, "sqlite://other.db");
        assert_eq!(c.seed_dir, PathBuf::from("seeds"));
        assert_eq!(c.bind_addr(), "0.0.0.0:8080");
        assert_eq!(c.max_page_size, 250);
        assert_eq!(c.rate_limit_per_minute, 0);
    }

    #[test]
    fn bad_numbers_are_errors() {
        assert!(matches!(
            from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidValue { key: "PORT", .. })
        ));
        assert!(from_lookup(lookup(&[("MAX_PAGE_SIZE", "0")])).is_err());
    }
}
