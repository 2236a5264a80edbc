//! Runtime configuration.

use std::str::FromStr;

use game_core::GameConfig;

use crate::error::{Result, RuntimeError};

/// Daily caps and day-boundary settings for the quota limiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaConfig {
    pub lifespan_daily: u64,
    pub dungeon_attempts_daily: u64,
    pub ranking_challenges_daily: u64,
    /// Offset of the world's reset timezone from UTC.
    pub utc_offset_hours: i32,
    /// Counter keys outlive their day by this much before expiring.
    pub key_ttl_hours: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            lifespan_daily: 200,
            dungeon_attempts_daily: 3,
            ranking_challenges_daily: 10,
            utc_offset_hours: 8,
            key_ttl_hours: 48,
        }
    }
}

/// Runtime configuration shared across the service and its collaborators.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub quota: QuotaConfig,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            quota: QuotaConfig::default(),
            event_buffer_size: 100,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `QUOTA_*` and `EVENT_BUFFER_SIZE` variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let quota = &mut config.quota;

        override_with(&lookup, "QUOTA_LIFESPAN_DAILY", &mut quota.lifespan_daily)?;
        override_with(&lookup, "QUOTA_DUNGEON_ATTEMPTS_DAILY", &mut quota.dungeon_attempts_daily)?;
        override_with(
            &lookup,
            "QUOTA_RANKING_CHALLENGES_DAILY",
            &mut quota.ranking_challenges_daily,
        )?;
        override_with(&lookup, "QUOTA_UTC_OFFSET_HOURS", &mut quota.utc_offset_hours)?;
        override_with(&lookup, "EVENT_BUFFER_SIZE", &mut config.event_buffer_size)?;

        if !(-12..=14).contains(&config.quota.utc_offset_hours) {
            return Err(RuntimeError::InvalidSetting {
                name: "QUOTA_UTC_OFFSET_HOURS",
                value: config.quota.utc_offset_hours.to_string(),
            });
        }
        if config.event_buffer_size == 0 {
            return Err(RuntimeError::InvalidSetting {
                name: "EVENT_BUFFER_SIZE",
                value: "0".to_owned(),
            });
        }
        Ok(config)
    }

    pub fn with_game_config(mut self, game_config: GameConfig) -> Self {
        self.game_config = game_config;
        self
    }

    pub fn with_quota(mut self, quota: QuotaConfig) -> Self {
        self.quota = quota;
        self
    }
}

fn override_with<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    slot: &mut T,
) -> Result<()> {
    if let Some(raw) = lookup(name) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| RuntimeError::InvalidSetting { name, value: raw })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = RuntimeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.quota, QuotaConfig::default());
        assert_eq!(config.event_buffer_size, 100);
    }

    #[test]
    fn variables_override_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("QUOTA_LIFESPAN_DAILY", "500"),
            ("QUOTA_UTC_OFFSET_HOURS", "-5"),
        ]))
        .unwrap();
        assert_eq!(config.quota.lifespan_daily, 500);
        assert_eq!(config.quota.utc_offset_hours, -5);
        assert_eq!(config.quota.dungeon_attempts_daily, 3);
    }

    #[test]
    fn unparsable_values_name_the_variable() {
        let vars = lookup(&[("QUOTA_DUNGEON_ATTEMPTS_DAILY", "many")]);
        let error = RuntimeConfig::from_lookup(vars).unwrap_err();
        assert!(matches!(
            error,
            RuntimeError::InvalidSetting {
                name: "QUOTA_DUNGEON_ATTEMPTS_DAILY",
                ..
            }
        ));
    }

    #[test]
    fn offset_out_of_range_is_rejected() {
        assert!(RuntimeConfig::from_lookup(lookup(&[("QUOTA_UTC_OFFSET_HOURS", "20")])).is_err());
    }
}
