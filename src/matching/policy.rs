// src/matching/policy.rs
use log::info;

/// Which exact-tier village evidence is accepted besides whole-token equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    /// Token contains the village name or the name contains the token.
    pub substring_matching: bool,
    /// A run of one to three address tokens spells the full village name.
    pub phrase_matching: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            substring_matching: true,
            phrase_matching: true,
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(default)
}

impl MatchPolicy {
    pub fn from_env() -> Self {
        Self {
            substring_matching: env_flag("MATCH_SUBSTRING_ENABLED", true),
            phrase_matching: env_flag("MATCH_PHRASE_ENABLED", true),
        }
    }

    pub fn exact_only() -> Self {
        Self {
            substring_matching: false,
            phrase_matching: false,
        }
    }

    pub fn log_config(&self) {
        info!("🔤 Match policy configuration:");
        info!("   Substring matching: {}", self.substring_matching);
        info!("   Phrase matching: {}", self.phrase_matching);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_match_policy_from_env() {
        env::remove_var("MATCH_SUBSTRING_ENABLED");
        env::remove_var("MATCH_PHRASE_ENABLED");
        assert_eq!(MatchPolicy::from_env(), MatchPolicy::default());

        env::set_var("MATCH_SUBSTRING_ENABLED", "false");
        env::set_var("MATCH_PHRASE_ENABLED", "TRUE");
        let policy = MatchPolicy::from_env();
        assert!(!policy.substring_matching);
        assert!(policy.phrase_matching);

        env::remove_var("MATCH_SUBSTRING_ENABLED");
        env::remove_var("MATCH_PHRASE_ENABLED");
    }
}
