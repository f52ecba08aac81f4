// SPDX-License-Identifier: Apache-2.0

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub cors_allowed_origins: Vec<String>,
    pub shutdown_drain_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            cors_allowed_origins: vec!["*".to_string()],
            shutdown_drain_ms: 5000,
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_body_bytes == 0 {
            return Err("max_body_bytes must be greater than zero".to_string());
        }
        if self.cors_allowed_origins.iter().any(|o| o.is_empty()) {
            return Err("cors_allowed_origins must not contain empty entries".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ApiConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(ApiConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_body_limit_is_rejected() {
        let cfg = ApiConfig {
            max_body_bytes: 0,
            ..ApiConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
