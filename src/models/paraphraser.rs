use validator::Validate;

use crate::errors::SimplifyError;

/// Decoder length limits for one generation, counted in model tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
pub struct GenerationBounds {
    #[validate(range(min = 1, message = "max_length must be a positive integer"))]
    pub max_length: i64,
    #[validate(range(min = 0, message = "min_length must not be negative"))]
    pub min_length: i64,
}

impl GenerationBounds {
    pub fn new(max_length: i64, min_length: i64) -> Self {
        Self {
            max_length,
            min_length,
        }
    }

    pub fn checked(self) -> Result<Self, SimplifyError> {
        self.validate()?;
        Ok(self)
    }
}

/// A loaded text-to-text model that rewrites its input.
///
/// Implementations decode greedily, so the same input and bounds always
/// produce the same candidates. Calls block the current thread.
#[cfg_attr(test, mockall::automock)]
pub trait Paraphraser: Send + Sync {
    /// Returns one or more candidates, best first.
    fn generate(&self, input: &str, bounds: GenerationBounds) -> Result<Vec<String>, SimplifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100, 10)]
    #[case(1, 0)]
    #[case(5, 50)]
    fn accepts_positive_max_and_non_negative_min(#[case] max: i64, #[case] min: i64) {
        assert!(GenerationBounds::new(max, min).checked().is_ok());
    }

    #[rstest]
    #[case(0, 0)]
    #[case(-1, 10)]
    #[case(100, -3)]
    fn rejects_malformed_bounds_as_validation_errors(#[case] max: i64, #[case] min: i64) {
        let err = GenerationBounds::new(max, min).checked().unwrap_err();
        assert!(matches!(err, SimplifyError::RequestValidation(_)));
    }
}
