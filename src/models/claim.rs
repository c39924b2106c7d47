use crate::error::ClaimCheckError;
use std::fmt;

/// A user-submitted health claim, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClaimText(String);

impl ClaimText {
    pub fn parse(raw: &str) -> Result<Self, ClaimCheckError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ClaimCheckError::EmptyClaim);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ClaimText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClaimText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
