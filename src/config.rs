use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

const MAX_QUIZ_LENGTH: usize = 50;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_quiz_length")]
    pub quiz_length: usize,
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default = "default_show_explanations")]
    pub show_explanations: bool,
}

fn default_quiz_length() -> usize {
    10
}
fn default_category() -> String {
    "all".to_string()
}
fn default_show_explanations() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiz_length: default_quiz_length(),
            default_category: default_category(),
            show_explanations: default_show_explanations(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("permitdrill")
            .join("config.toml")
    }

    /// Clamp out-of-range values and validate the category against the bank.
    /// Call after deserialization to handle stale keys from old configs.
    pub fn normalize(&mut self, categories: &[&str]) {
        self.quiz_length = self.quiz_length.clamp(1, MAX_QUIZ_LENGTH);
        if self.default_category != "all"
            && !categories.contains(&self.default_category.as_str())
        {
            self.default_category = default_category();
        }
    }

    /// The configured category as a selection filter; "all" means no filter.
    pub fn category_filter(&self) -> Option<&str> {
        if self.default_category == "all" {
            None
        } else {
            Some(self.default_category.as_str())
        }
    }
}
