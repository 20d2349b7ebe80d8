//! Admin Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::wire_enum;

wire_enum! {
    /// Admin role
    AdminRole as "admin_role" {
        SuperAdmin => "super_admin",
        Admin => "admin",
    }
}

/// Admin account as returned by the API (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Admin {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: AdminRole,
    /// Relative path under the uploads root, e.g. `admins/<uuid>.png`
    pub profile_img: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Admin {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == AdminRole::SuperAdmin
    }
}

/// Create admin payload (super admin only)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdminCreate {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "must be 8-128 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub role: Option<AdminRole>,
}

/// Update admin payload (super admin only)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AdminUpdate {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub role: Option<AdminRole>,
    pub is_active: Option<bool>,
}

/// Own-profile update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// Own-password change payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordChange {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, max = 128, message = "must be 8-128 characters"))]
    pub new_password: String,
}

// ── Login flow ──────────────────────────────────────────────────────

/// Where an admin stands in the two-step login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    OtpPending,
    Authenticated,
    Locked,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(equal = 6, message = "must be 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UnlockRequest {
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Response of `login` / `resend-otp`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpPendingResponse {
    pub state: SessionState,
    pub email: String,
    /// OTP lifetime in seconds
    pub expires_in: u64,
}

/// Response of `verify-otp`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedResponse {
    pub state: SessionState,
    pub admin: Admin,
    pub token: String,
}

/// Response of `session`, `lock`, `unlock`, `logout`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<Admin>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_create_validation() {
        let ok = AdminCreate {
            email: "ops@abyhr.rw".into(),
            password: "correct-horse".into(),
            first_name: "Aline".into(),
            last_name: "Uwase".into(),
            phone: None,
            role: None,
        };
        assert!(ok.validate().is_ok());

        let bad = AdminCreate {
            email: "not-an-email".into(),
            password: "short".into(),
            ..ok
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_verify_otp_requires_six_chars() {
        let req = VerifyOtpRequest {
            email: "ops@abyhr.rw".into(),
            otp: "12345".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_session_state_wire_format() {
        assert_eq!(
            serde_json::to_string(&SessionState::OtpPending).unwrap(),
            "\"otp_pending\""
        );
        let resp = SessionResponse {
            state: SessionState::Unauthenticated,
            admin: None,
        };
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"state":"unauthenticated"}"#
        );
    }

    #[test]
    fn test_admin_role_wire_format() {
        assert_eq!(AdminRole::SuperAdmin.as_str(), "super_admin");
        let role: AdminRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, AdminRole::Admin);
    }
}
