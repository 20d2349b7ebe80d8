//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Admin account errors
//! - 4xxx: Client errors
//! - 5xxx: Recruitment errors
//! - 6xxx: Catalog errors
//! - 7xxx: Upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the dashboard and the
/// mobile app can switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Required field missing
    RequiredField = 7,
    /// Too many requests from the same address
    RateLimited = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session was closed by logout
    SessionRevoked = 1005,
    /// Session is locked and must be unlocked with the password
    SessionLocked = 1006,
    /// Account is disabled
    AccountDisabled = 1007,
    /// No pending OTP, or it expired
    OtpExpired = 1101,
    /// OTP does not match
    OtpInvalid = 1102,
    /// Too many wrong OTP attempts
    TooManyAttempts = 1103,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Super admin role required
    SuperAdminRequired = 2002,
    /// Cannot delete own account
    CannotDeleteSelf = 2003,

    // ==================== 3xxx: Admin ====================
    /// Admin not found
    AdminNotFound = 3001,
    /// Admin email already registered
    AdminEmailExists = 3002,

    // ==================== 4xxx: Client ====================
    /// Client not found
    ClientNotFound = 4001,
    /// Client email already registered
    ClientEmailExists = 4002,

    // ==================== 5xxx: Recruitment ====================
    /// Job not found
    JobNotFound = 5001,
    /// Job no longer accepts applications
    JobClosed = 5002,
    /// Applicant not found
    ApplicantNotFound = 5101,
    /// Applicant already applied to this job
    ApplicantAlreadyApplied = 5102,

    // ==================== 6xxx: Catalog ====================
    /// Department not found
    DepartmentNotFound = 6001,
    /// Department name already exists
    DepartmentNameExists = 6002,
    /// Activity not found
    ActivityNotFound = 6101,
    /// National figure not found
    NationalFigureNotFound = 6201,
    /// SDG goal outside 1..=17
    InvalidSdgGoal = 6202,

    // ==================== 7xxx: Upload ====================
    /// File too large
    FileTooLarge = 7001,
    /// Unsupported file format
    UnsupportedFileFormat = 7002,
    /// Invalid image file
    InvalidImageFile = 7003,
    /// No file provided
    NoFileProvided = 7004,
    /// Empty file provided
    EmptyFile = 7005,
    /// Malformed multipart body
    InvalidMultipart = 7006,
    /// File storage failed
    FileStorageFailed = 7007,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// TTL store (Redis) error
    CacheError = 9003,
    /// Mail delivery failed
    MailDeliveryFailed = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::RateLimited => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionRevoked => "Session has been logged out",
            ErrorCode::SessionLocked => "Session is locked",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::OtpExpired => "Verification code has expired",
            ErrorCode::OtpInvalid => "Invalid verification code",
            ErrorCode::TooManyAttempts => "Too many attempts",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::SuperAdminRequired => "Super admin role is required",
            ErrorCode::CannotDeleteSelf => "Cannot delete own account",

            // Admin
            ErrorCode::AdminNotFound => "Admin not found",
            ErrorCode::AdminEmailExists => "Admin email already exists",

            // Client
            ErrorCode::ClientNotFound => "Client not found",
            ErrorCode::ClientEmailExists => "Client email already exists",

            // Recruitment
            ErrorCode::JobNotFound => "Job not found",
            ErrorCode::JobClosed => "Job is closed for applications",
            ErrorCode::ApplicantNotFound => "Applicant not found",
            ErrorCode::ApplicantAlreadyApplied => "Applicant already applied to this job",

            // Catalog
            ErrorCode::DepartmentNotFound => "Department not found",
            ErrorCode::DepartmentNameExists => "Department name already exists",
            ErrorCode::ActivityNotFound => "Activity not found",
            ErrorCode::NationalFigureNotFound => "National figure not found",
            ErrorCode::InvalidSdgGoal => "SDG goal must be between 1 and 17",

            // Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::InvalidMultipart => "Invalid multipart request",
            ErrorCode::FileStorageFailed => "File storage failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::CacheError => "Cache error",
            ErrorCode::MailDeliveryFailed => "Mail delivery failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            7 => Ok(ErrorCode::RequiredField),
            9 => Ok(ErrorCode::RateLimited),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionRevoked),
            1006 => Ok(ErrorCode::SessionLocked),
            1007 => Ok(ErrorCode::AccountDisabled),
            1101 => Ok(ErrorCode::OtpExpired),
            1102 => Ok(ErrorCode::OtpInvalid),
            1103 => Ok(ErrorCode::TooManyAttempts),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::SuperAdminRequired),
            2003 => Ok(ErrorCode::CannotDeleteSelf),

            // Admin
            3001 => Ok(ErrorCode::AdminNotFound),
            3002 => Ok(ErrorCode::AdminEmailExists),

            // Client
            4001 => Ok(ErrorCode::ClientNotFound),
            4002 => Ok(ErrorCode::ClientEmailExists),

            // Recruitment
            5001 => Ok(ErrorCode::JobNotFound),
            5002 => Ok(ErrorCode::JobClosed),
            5101 => Ok(ErrorCode::ApplicantNotFound),
            5102 => Ok(ErrorCode::ApplicantAlreadyApplied),

            // Catalog
            6001 => Ok(ErrorCode::DepartmentNotFound),
            6002 => Ok(ErrorCode::DepartmentNameExists),
            6101 => Ok(ErrorCode::ActivityNotFound),
            6201 => Ok(ErrorCode::NationalFigureNotFound),
            6202 => Ok(ErrorCode::InvalidSdgGoal),

            // Upload
            7001 => Ok(ErrorCode::FileTooLarge),
            7002 => Ok(ErrorCode::UnsupportedFileFormat),
            7003 => Ok(ErrorCode::InvalidImageFile),
            7004 => Ok(ErrorCode::NoFileProvided),
            7005 => Ok(ErrorCode::EmptyFile),
            7006 => Ok(ErrorCode::InvalidMultipart),
            7007 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::CacheError),
            9006 => Ok(ErrorCode::MailDeliveryFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
