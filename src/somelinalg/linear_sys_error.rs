use std::fmt;

/// Error types for solving systems of linear equations
#[derive(Debug, Clone, PartialEq)]
pub enum LinearSystemError {
    /// matrix of coefficients is not square
    NotSquare { rows: usize, cols: usize },
    /// number of equations differs from the number of free terms
    DimensionMismatch { equations: usize, free_terms: usize },
    /// no usable pivot at the given elimination step: the system has no unique solution.
    /// The buffers are left half-eliminated and must be discarded.
    SingularSystem { row: usize },
    /// malformed task document or configuration
    InvalidTask(String),
}

impl LinearSystemError {
    /// checks that the coefficients are square and match the free terms; runs before any mutation
    pub fn check_dimensions(shape: (usize, usize), free_terms: usize) -> Result<(), Self> {
        let (rows, cols) = shape;
        if rows != cols {
            return Err(LinearSystemError::NotSquare { rows, cols });
        }
        if rows != free_terms {
            return Err(LinearSystemError::DimensionMismatch {
                equations: rows,
                free_terms,
            });
        }
        Ok(())
    }

    /// true for the errors that reject the input before anything is computed
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            LinearSystemError::NotSquare { .. } | LinearSystemError::DimensionMismatch { .. }
        )
    }
}

impl fmt::Display for LinearSystemError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LinearSystemError::NotSquare { rows, cols } => write!(
                f,
                "Matrix of coefficients is not square: {} rows, {} columns",
                rows, cols
            ),
            LinearSystemError::DimensionMismatch {
                equations,
                free_terms,
            } => write!(
                f,
                "Matrix of coefficients has {} rows but there are {} free terms",
                equations, free_terms
            ),
            LinearSystemError::SingularSystem { row } => write!(
                f,
                "System has no unique solution: no non-zero pivot for row {}",
                row
            ),
            LinearSystemError::InvalidTask(msg) => write!(f, "Invalid task: {}", msg),
        }
    }
}

impl std::error::Error for LinearSystemError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dimensions() {
        assert_eq!(LinearSystemError::check_dimensions((3, 3), 3), Ok(()));
        assert_eq!(LinearSystemError::check_dimensions((0, 0), 0), Ok(()));
        assert_eq!(
            LinearSystemError::check_dimensions((2, 3), 2),
            Err(LinearSystemError::NotSquare { rows: 2, cols: 3 })
        );
        assert_eq!(
            LinearSystemError::check_dimensions((3, 3), 4),
            Err(LinearSystemError::DimensionMismatch {
                equations: 3,
                free_terms: 4
            })
        );
    }

    #[test]
    fn test_display_and_classification() {
        let error = LinearSystemError::SingularSystem { row: 2 };
        assert_eq!(
            error.to_string(),
            "System has no unique solution: no non-zero pivot for row 2"
        );
        assert!(!error.is_invalid_argument());
        assert!(LinearSystemError::NotSquare { rows: 1, cols: 2 }.is_invalid_argument());
    }
}
