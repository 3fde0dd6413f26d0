/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription tier of a user as reported by the identity service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Premium,
}

impl Plan {
    /// Anything other than an explicit "premium" is treated as the free tier
    pub fn from_claim(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("premium") => Plan::Premium,
            _ => Plan::Free,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Premium => "premium",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature classification of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureTier {
    /// Quota-limited for free users
    Standard,
    /// Blocked entirely for free users
    PremiumOnly,
}

/// Kind of content stored in the creations ledger (`type` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreationKind {
    Article,
    BlogTitle,
    Image,
    ResumeReview,
}

impl CreationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreationKind::Article => "article",
            CreationKind::BlogTitle => "blog-title",
            CreationKind::Image => "image",
            CreationKind::ResumeReview => "resume-review",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "article" => Some(CreationKind::Article),
            "blog-title" => Some(CreationKind::BlogTitle),
            "image" => Some(CreationKind::Image),
            "resume-review" => Some(CreationKind::ResumeReview),
            _ => None,
        }
    }
}

impl fmt::Display for CreationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
