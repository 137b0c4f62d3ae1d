//! User-facing language for service prompts and fallback text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Simplified Chinese.
    Zh,
}

impl Language {
    /// Wire code (`"en"` / `"zh"`).
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }

    /// Description stored on a fallback grade.
    pub fn generation_failed(self, reason: &str) -> String {
        match self {
            Self::En => format!("Generation Failed: {reason}"),
            Self::Zh => format!("生成失败: {reason}"),
        }
    }

    /// Reason used when the service could not be reached.
    pub fn network_error(self) -> &'static str {
        match self {
            Self::En => "Network Error: Could not reach server",
            Self::Zh => "网络错误: 无法连接服务器",
        }
    }

    /// Reason used when the service gave no usable detail.
    pub fn unknown_error(self) -> &'static str {
        match self {
            Self::En => "Unknown Error",
            Self::Zh => "未知错误",
        }
    }

    /// Style names offered when the suggestion call fails.
    pub fn fallback_suggestions(self) -> [&'static str; 4] {
        match self {
            Self::En => [
                "Cinematic High Contrast",
                "Warm Vintage",
                "Cool Moody",
                "Natural Enhancer",
            ],
            Self::Zh => ["电影高对比", "复古胶片暖调", "冷调情绪", "自然增强"],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "zh" | "zh-cn" | "chinese" => Ok(Self::Zh),
            other => Err(format!("unknown language: {other}")),
        }
    }
}
