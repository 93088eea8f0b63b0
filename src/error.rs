//! Error types for matbench.
//!
//! Every failure in the benchmark is fatal: library code reports it through
//! [`MatbenchError`] and the binary turns it into a diagnostic and a non-zero
//! exit status.

use std::fmt;

/// Errors that can occur while preparing or running a benchmark sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatbenchError {
    /// The allocator could not provide an aligned matrix buffer.
    AllocationError {
        /// The size that was requested to be allocated, in bytes.
        requested_size: usize,
        /// The alignment that was requested.
        requested_alignment: usize,
        /// Human-readable error message.
        message: String,
    },
    /// The requested buffer cannot be described by a valid memory layout.
    LayoutError {
        /// The size parameter that caused the error.
        size: usize,
        /// The alignment parameter that caused the error.
        alignment: usize,
        /// Human-readable error message.
        message: String,
    },
    /// A command-line argument was not recognized or lacks its value.
    InvalidArgument {
        /// Human-readable error message.
        message: String,
    },
    /// Writing the report stream failed.
    Io {
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for MatbenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatbenchError::AllocationError {
                requested_size,
                requested_alignment,
                message,
            } => write!(
                f,
                "Memory allocation failed: {} (requested {} bytes with {} byte alignment)",
                message, requested_size, requested_alignment
            ),
            MatbenchError::LayoutError {
                size,
                alignment,
                message,
            } => write!(
                f,
                "Invalid memory layout: {} (size: {}, alignment: {})",
                message, size, alignment
            ),
            MatbenchError::InvalidArgument { message } => {
                write!(f, "Invalid argument: {}", message)
            }
            MatbenchError::Io { message } => write!(f, "I/O error: {}", message),
        }
    }
}

impl std::error::Error for MatbenchError {}

impl From<std::io::Error> for MatbenchError {
    fn from(error: std::io::Error) -> Self {
        MatbenchError::Io {
            message: error.to_string(),
        }
    }
}

/// Result type alias for matbench operations.
pub type Result<T> = std::result::Result<T, MatbenchError>;

/// Creates an allocation error.
pub fn allocation_error(size: usize, alignment: usize, message: impl Into<String>) -> MatbenchError {
    MatbenchError::AllocationError {
        requested_size: size,
        requested_alignment: alignment,
        message: message.into(),
    }
}

/// Creates a layout error.
pub fn layout_error(size: usize, alignment: usize, message: impl Into<String>) -> MatbenchError {
    MatbenchError::LayoutError {
        size,
        alignment,
        message: message.into(),
    }
}

/// Creates an invalid argument error.
pub fn invalid_argument(message: impl Into<String>) -> MatbenchError {
    MatbenchError::InvalidArgument {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_error_display() {
        let error = allocation_error(4096, 64, "out of memory");
        let display = format!("{}", error);
        assert!(display.contains("Memory allocation failed"));
        assert!(display.contains("4096 bytes"));
        assert!(display.contains("64 byte alignment"));
        assert!(display.contains("out of memory"));
    }

    #[test]
    fn test_layout_error_display() {
        let error = layout_error(1000, 48, "alignment must be power of two");
        let display = format!("{}", error);
        assert!(display.contains("Invalid memory layout"));
        assert!(display.contains("size: 1000"));
        assert!(display.contains("alignment: 48"));
    }

    #[test]
    fn test_invalid_argument_display() {
        let error = invalid_argument("unknown argument: --fast");
        assert_eq!(error.to_string(), "Invalid argument: unknown argument: --fast");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let error: MatbenchError = io.into();
        assert!(matches!(error, MatbenchError::Io { .. }));
        assert!(error.to_string().contains("read-only"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = allocation_error(1024, 64, "test");
        let error2 = allocation_error(1024, 64, "test");
        let error3 = allocation_error(2048, 64, "test");

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = allocation_error(1024, 64, "test error");
        let _: &dyn std::error::Error = &error;
        assert!(std::error::Error::source(&error).is_none());
    }
}
