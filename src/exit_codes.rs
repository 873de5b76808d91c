//! Exit code standardization for costchef
//!
//! ## Exit Code Convention
//!
//! - `0` = Success (including runs that found nothing)
//! - `1` = Failure: configuration error, no accessible compartments,
//!   user interrupt, or any unhandled error

use crate::error::CostChefError;

/// Standard exit codes for costchef
pub mod codes {
    /// Success
    pub const SUCCESS: u8 = 0;
    /// Any failure that aborted the run
    pub const FAILURE: u8 = 1;
}

/// Map a CostChefError to an exit code.
///
/// Every error that reaches the top level aborted the run, so they all map to
/// `FAILURE`. Kept as a function so the binary has one place to change if the
/// convention ever splits by error kind.
pub fn exit_code_for_error(error: &CostChefError) -> u8 {
    match error {
        CostChefError::Config(_)
        | CostChefError::CloudProvider { .. }
        | CostChefError::Validation { .. }
        | CostChefError::ReportWrite { .. }
        | CostChefError::Io(_)
        | CostChefError::Json(_) => codes::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_config_errors_fail() {
        let err = CostChefError::Config(ConfigError::MissingField("tenancy".to_string()));
        assert_eq!(exit_code_for_error(&err), codes::FAILURE);
    }

    #[test]
    fn test_report_write_fails() {
        let err = CostChefError::ReportWrite {
            path: "/nope/report.html".into(),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(exit_code_for_error(&err), 1);
        assert_ne!(codes::SUCCESS, codes::FAILURE);
    }
}
