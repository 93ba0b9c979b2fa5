/// Upload validation errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {0} (expected image/*)")]
    InvalidContentType(String),

    #[error("Empty file")]
    EmptyFile,
}

/// A file part that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    /// Basename of the client-supplied filename.
    pub filename: String,
    pub content_type: String,
}

/// Validates multipart file uploads before any decoding happens.
pub struct UploadValidator {
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    /// Strip client-supplied directory components and reject names that
    /// end up empty or refer to a directory.
    pub fn sanitize_filename(&self, raw: &str) -> Result<String, ValidationError> {
        let name = raw
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();

        if name.is_empty() || name == "." || name == ".." || name.chars().any(char::is_control) {
            return Err(ValidationError::InvalidFilename(raw.to_string()));
        }

        Ok(name.to_string())
    }

    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.trim().to_lowercase();
        let is_image = normalized
            .strip_prefix("image/")
            .is_some_and(|subtype| !subtype.is_empty());

        if !is_image {
            return Err(ValidationError::InvalidContentType(content_type.to_string()));
        }

        Ok(())
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Run every check on one file part.
    pub fn validate(
        &self,
        filename: Option<&str>,
        content_type: Option<&str>,
        size: usize,
    ) -> Result<ValidatedUpload, ValidationError> {
        let filename = self.sanitize_filename(filename.unwrap_or_default())?;
        let content_type = content_type.unwrap_or_default();
        self.validate_content_type(content_type)?;
        self.validate_file_size(size)?;

        Ok(ValidatedUpload {
            filename,
            content_type: content_type.to_string(),
        })
    }
}
