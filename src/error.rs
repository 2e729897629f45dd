use std::fmt;

use serde::Serialize;

/// An error raised when an operation that is only defined on closed
/// terms encounters a solver variable.
///
/// Variables exist solely so that a rendered [`crate::LinearSystem`] can
/// name its unknowns; they are never part of a term built through the
/// public constructors, so hitting one outside the solver means the
/// input was assembled from solver output in a way the algebra does not
/// support.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TermError {
    /// A variable was reached by a closed-term operation.
    UnexpectedVariable {
        /// The variable in its printed form, e.g. `X[a‖b]`.
        variable: String,
    },
}

impl fmt::Display for TermError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedVariable { variable } => {
                write!(f, "unexpected variable {variable} in a closed term")
            }
        }
    }
}

impl std::error::Error for TermError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_error_display() {
        let err = TermError::UnexpectedVariable {
            variable: "X[a‖b]".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected variable X[a‖b] in a closed term");
    }

    #[test]
    fn term_error_serializes() {
        let err = TermError::UnexpectedVariable {
            variable: "X[1]".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"UnexpectedVariable":{"variable":"X[1]"}}"#);
    }
}
