use dashmap::DashMap;
use std::env;
use std::sync::Arc;

/// Configuration service: a mutable snapshot of the process environment.
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let config = ConfigService::default();
        config.set("PORT", "8080");
        assert_eq!(config.get("PORT").as_deref(), Some("8080"));
    }

    #[test]
    fn get_or_falls_back() {
        let config = ConfigService::default();
        assert_eq!(config.get_or("MISSING", "fallback"), "fallback");
    }
}
