use crate::providers::Upload;
use crate::types::{CreationKind, FeatureTier};

/// Largest accepted resume upload
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Largest accepted image upload
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Upper bound on the requested article length, in tokens
pub const MAX_ARTICLE_LENGTH: u32 = 4096;

pub const BLOG_TITLE_MAX_TOKENS: u32 = 100;
pub const RESUME_REVIEW_MAX_TOKENS: u32 = 1000;

const MAX_PROMPT_CHARS: usize = 8000;
const MAX_OBJECT_CHARS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_image_bytes: usize,
    pub max_resume_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_image_bytes: MAX_IMAGE_BYTES,
            max_resume_bytes: MAX_RESUME_BYTES,
        }
    }
}

/// Parameters of one generation request, decoded at the HTTP boundary
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    Article { prompt: String, length: u32 },
    BlogTitle { prompt: String },
    Image { prompt: String, publish: bool },
    RemoveBackground { image: Upload },
    RemoveObject { image: Upload, object: String },
    ResumeReview { resume: Upload },
}

impl GenerationRequest {
    /// Route-style name used in logs
    pub fn operation(&self) -> &'static str {
        match self {
            GenerationRequest::Article { .. } => "generate-article",
            GenerationRequest::BlogTitle { .. } => "generate-blog-title",
            GenerationRequest::Image { .. } => "generate-image",
            GenerationRequest::RemoveBackground { .. } => "remove-image-background",
            GenerationRequest::RemoveObject { .. } => "remove-image-object",
            GenerationRequest::ResumeReview { .. } => "review-resume",
        }
    }

    pub fn kind(&self) -> CreationKind {
        match self {
            GenerationRequest::Article { .. } => CreationKind::Article,
            GenerationRequest::BlogTitle { .. } => CreationKind::BlogTitle,
            GenerationRequest::Image { .. }
            | GenerationRequest::RemoveBackground { .. }
            | GenerationRequest::RemoveObject { .. } => CreationKind::Image,
            GenerationRequest::ResumeReview { .. } => CreationKind::ResumeReview,
        }
    }

    pub fn tier(&self) -> FeatureTier {
        match self {
            GenerationRequest::Article { .. } | GenerationRequest::BlogTitle { .. } => {
                FeatureTier::Standard
            }
            GenerationRequest::Image { .. }
            | GenerationRequest::RemoveBackground { .. }
            | GenerationRequest::RemoveObject { .. }
            | GenerationRequest::ResumeReview { .. } => FeatureTier::PremiumOnly,
        }
    }

    /// Text stored in the ledger's prompt column
    pub fn ledger_prompt(&self) -> String {
        match self {
            GenerationRequest::Article { prompt, .. }
            | GenerationRequest::BlogTitle { prompt }
            | GenerationRequest::Image { prompt, .. } => prompt.clone(),
            GenerationRequest::RemoveBackground { .. } => "Remove background from image".to_string(),
            GenerationRequest::RemoveObject { object, .. } => {
                format!("Removed {} from image", object.trim())
            }
            GenerationRequest::ResumeReview { .. } => "Review the uploaded resume".to_string(),
        }
    }

    pub fn publish(&self) -> bool {
        matches!(self, GenerationRequest::Image { publish: true, .. })
    }

    /// Structural checks that need no external call
    pub fn validate(&self, limits: &UploadLimits) -> Result<(), String> {
        match self {
            GenerationRequest::Article { prompt, length } => {
                check_prompt(prompt)?;
                if *length == 0 || *length > MAX_ARTICLE_LENGTH {
                    return Err(format!("Length must be between 1 and {}", MAX_ARTICLE_LENGTH));
                }
                Ok(())
            }
            GenerationRequest::BlogTitle { prompt } | GenerationRequest::Image { prompt, .. } => {
                check_prompt(prompt)
            }
            GenerationRequest::RemoveBackground { image } => check_image(image, limits),
            GenerationRequest::RemoveObject { image, object } => {
                check_image(image, limits)?;
                check_object(object)
            }
            GenerationRequest::ResumeReview { resume } => check_resume(resume, limits),
        }
    }
}

pub fn resume_review_prompt(resume_text: &str) -> String {
    format!(
        "Review the following resume and provide constructive feedback on its strengths, \
         weaknesses, and areas for improvement. Resume Content:\n\n{}",
        resume_text
    )
}

fn check_prompt(prompt: &str) -> Result<(), String> {
    if prompt.trim().is_empty() {
        return Err("Prompt is required".to_string());
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err(format!("Prompt must be at most {} characters", MAX_PROMPT_CHARS));
    }
    Ok(())
}

fn check_image(image: &Upload, limits: &UploadLimits) -> Result<(), String> {
    if image.is_empty() {
        return Err("Image file is empty".to_string());
    }
    if !image.content_type.starts_with("image/") {
        return Err("Only image uploads are supported".to_string());
    }
    if image.len() > limits.max_image_bytes {
        return Err(format!(
            "Image exceeds the {} byte upload limit",
            limits.max_image_bytes
        ));
    }
    Ok(())
}

fn check_object(object: &str) -> Result<(), String> {
    let object = object.trim();
    if object.is_empty() {
        return Err("Object name is required".to_string());
    }
    if object.split_whitespace().count() > 1 {
        return Err("Please enter only one object name".to_string());
    }
    if object.chars().count() > MAX_OBJECT_CHARS
        || !object.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err("Object name contains unsupported characters".to_string());
    }
    Ok(())
}

fn check_resume(resume: &Upload, limits: &UploadLimits) -> Result<(), String> {
    if resume.is_empty() {
        return Err("Resume file is empty".to_string());
    }
    if resume.content_type != "application/pdf" {
        return Err("Only PDF resumes are supported".to_string());
    }
    if resume.len() > limits.max_resume_bytes {
        return Err(format!(
            "Resume file size exceeds allowed size ({}MB).",
            limits.max_resume_bytes / (1024 * 1024)
        ));
    }
    Ok(())
}
