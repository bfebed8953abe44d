// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod map;

pub use map::MapEnvironment;

pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn enabled(&self, key: &str, default_value: bool) -> Result<bool, EnvError> {
        match self.get(key) {
            Some(value) => match value.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" | "enabled" | "enable" => Ok(true),
                "false" | "0" | "no" | "off" | "disabled" | "disable" => Ok(false),
                _ => Err(EnvError::InvalidBoolean {
                    key: key.to_string(),
                    value,
                }),
            },
            None => Ok(default_value),
        }
    }

    fn get_or_else(&self, key: &str, default_value: &str) -> String {
        self.get(key).unwrap_or(default_value.to_string())
    }

    /// Comma-separated list, with surrounding whitespace and empty entries dropped
    fn get_list(&self, key: &str, default_value: Vec<String>) -> Vec<String> {
        self.get(key)
            .map(|value| {
                value
                    .split(',')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or(default_value)
    }

    fn get_u16(&self, key: &'static str, default_value: u16) -> Result<u16, EnvError> {
        match self.get(key) {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|e| EnvError::InvalidNumber {
                    env_key: key,
                    env_value: value.clone(),
                    message: e.to_string(),
                }),
            None => Ok(default_value),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error(
        "Invalid value for {key}: {value}. Expected true, 1, yes, on, enabled, enable OR false, 0, no, off, disabled, disable"
    )]
    InvalidBoolean { key: String, value: String },

    #[error("Invalid env value {env_value} for {env_key}: {message}")]
    InvalidEnum {
        env_key: &'static str,
        env_value: String,
        message: String,
    },

    #[error("Invalid number {env_value} for {env_key}: {message}")]
    InvalidNumber {
        env_key: &'static str,
        env_value: String,
        message: String,
    },
}

pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_accepts_common_spellings() {
        for value in ["true", "1", "Yes", "ON", "enabled"] {
            let env = MapEnvironment::from([("FLAG", value)]);
            assert!(env.enabled("FLAG", false).unwrap(), "{value}");
        }

        for value in ["false", "0", "no", "Off", " disabled "] {
            let env = MapEnvironment::from([("FLAG", value)]);
            assert!(!env.enabled("FLAG", true).unwrap(), "{value}");
        }
    }

    #[test]
    fn enabled_rejects_garbage() {
        let env = MapEnvironment::from([("FLAG", "maybe")]);
        assert!(matches!(
            env.enabled("FLAG", true),
            Err(EnvError::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn enabled_falls_back_to_default() {
        let env = MapEnvironment::new();
        assert!(env.enabled("FLAG", true).unwrap());
        assert!(!env.enabled("FLAG", false).unwrap());
    }

    #[test]
    fn get_list_trims_and_drops_empty_entries() {
        let env = MapEnvironment::from([("TYPES", " posts, comments,,people ")]);
        assert_eq!(
            env.get_list("TYPES", vec![]),
            vec!["posts", "comments", "people"]
        );

        let env = MapEnvironment::new();
        assert_eq!(
            env.get_list("TYPES", vec!["posts".to_string()]),
            vec!["posts"]
        );
    }

    #[test]
    fn get_u16_parses_or_reports() {
        let env = MapEnvironment::from([("PORT", "8080"), ("BAD_PORT", "eighty")]);
        assert_eq!(env.get_u16("PORT", 1).unwrap(), 8080);
        assert_eq!(env.get_u16("MISSING_PORT", 1).unwrap(), 1);
        assert!(matches!(
            env.get_u16("BAD_PORT", 1),
            Err(EnvError::InvalidNumber {
                env_key: "BAD_PORT",
                ..
            })
        ));
    }
}
