//! Authentication service implementation
//!
//! This service handles staff authentication: bcrypt password hashing,
//! JWT issuing/validation, and first-run admin bootstrap checks.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::settings::Settings;
use crate::database::repositories::{LoginCredentials, StaffRepository};
use crate::models::staff::{CreateLoginRequest, Staff};
use crate::utils::errors::{OpenAttendanceError, Result};
use crate::utils::helpers;

/// Claims carried inside a staff session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffClaims {
    /// Staff ID (subject)
    pub sub: String,
    pub staff_type: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authenticated request context extracted by the auth middleware
#[derive(Debug, Clone)]
pub struct StaffContext {
    pub staff_id: String,
    pub staff_type: String,
}

impl StaffContext {
    pub fn is_admin(&self) -> bool {
        self.staff_type == "admin"
    }

    /// Error out unless the caller is an admin
    pub fn ensure_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(OpenAttendanceError::PermissionDenied(
                "admin access required".to_string(),
            ))
        }
    }
}

/// Authentication service for password hashing and session tokens
#[derive(Clone)]
pub struct AuthService {
    staff_repository: StaffRepository,
    settings: Settings,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(staff_repository: StaffRepository, settings: Settings) -> Self {
        Self { staff_repository, settings }
    }

    /// Hash a password with the configured bcrypt cost
    pub fn hash_password(&self, password: &str) -> Result<String> {
        if password.len() < 8 {
            return Err(OpenAttendanceError::InvalidInput(
                "password must be at least 8 characters".to_string(),
            ));
        }
        Ok(bcrypt::hash(password, self.settings.auth.bcrypt_cost)?)
    }

    /// Verify a password against its stored hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        Ok(bcrypt::verify(password, hash)?)
    }

    /// Build the hashed credential payload for a new login.
    ///
    /// Returns the credentials plus the plaintext recovery code, which is
    /// shown to the caller exactly once.
    pub fn prepare_credentials(
        &self,
        request: &CreateLoginRequest,
    ) -> Result<(LoginCredentials, String)> {
        let recovery_code = helpers::generate_recovery_code();
        let security_answer_hash = match &request.security_answer {
            Some(answer) => Some(bcrypt::hash(answer.trim().to_lowercase(), self.settings.auth.bcrypt_cost)?),
            None => None,
        };

        let credentials = LoginCredentials {
            username: request.username.clone(),
            password_hash: self.hash_password(&request.password)?,
            security_question: request.security_question.clone(),
            security_answer_hash,
            recovery_code_hash: Some(bcrypt::hash(&recovery_code, self.settings.auth.bcrypt_cost)?),
        };

        Ok((credentials, recovery_code))
    }

    /// Verify credentials and issue a session token
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, Staff)> {
        let login = self
            .staff_repository
            .find_login_by_username(username)
            .await?
            .ok_or_else(|| OpenAttendanceError::Authentication("invalid credentials".to_string()))?;

        if !self.verify_password(password, &login.password_hash)? {
            debug!(username = username, "Password verification failed");
            return Err(OpenAttendanceError::Authentication("invalid credentials".to_string()));
        }

        let staff = self
            .staff_repository
            .find_by_staff_id(&login.staff_id)
            .await?
            .ok_or_else(|| OpenAttendanceError::StaffNotFound {
                staff_id: login.staff_id.clone(),
            })?;

        if !staff.active {
            return Err(OpenAttendanceError::PermissionDenied(
                "staff account is inactive".to_string(),
            ));
        }

        let token = self.issue_token(&staff)?;
        info!(staff_id = %staff.staff_id, staff_type = %staff.staff_type, "Staff logged in");
        Ok((token, staff))
    }

    /// Issue a signed session token for a staff member
    pub fn issue_token(&self, staff: &Staff) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = StaffClaims {
            sub: staff.staff_id.clone(),
            staff_type: staff.staff_type.clone(),
            iat: now,
            exp: now + self.settings.auth.token_ttl_seconds as i64,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.auth.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Validate a bearer token and return the request context
    pub fn verify_token(&self, token: &str) -> Result<StaffContext> {
        let data = decode::<StaffClaims>(
            token,
            &DecodingKey::from_secret(self.settings.auth.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(StaffContext {
            staff_id: data.claims.sub,
            staff_type: data.claims.staff_type,
        })
    }

    /// Change a staff member's password after verifying the current one
    pub async fn change_password(
        &self,
        staff_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let login = self
            .staff_repository
            .find_login_by_staff_id(staff_id)
            .await?
            .ok_or_else(|| OpenAttendanceError::StaffNotFound {
                staff_id: staff_id.to_string(),
            })?;

        if !self.verify_password(current_password, &login.password_hash)? {
            return Err(OpenAttendanceError::Authentication(
                "current password is incorrect".to_string(),
            ));
        }

        let new_hash = self.hash_password(new_password)?;
        self.staff_repository.update_password_hash(staff_id, &new_hash).await?;
        info!(staff_id = staff_id, "Password changed");
        Ok(())
    }

    /// Reset a password using the security answer or recovery code
    pub async fn recover_password(
        &self,
        username: &str,
        security_answer: Option<&str>,
        recovery_code: Option<&str>,
        new_password: &str,
    ) -> Result<()> {
        let login = self
            .staff_repository
            .find_login_by_username(username)
            .await?
            .ok_or_else(|| OpenAttendanceError::Authentication("invalid credentials".to_string()))?;

        let verified = match (security_answer, &login.security_answer_hash) {
            (Some(answer), Some(hash)) => {
                self.verify_password(&answer.trim().to_lowercase(), hash)?
            }
            _ => false,
        } || match (recovery_code, &login.recovery_code_hash) {
            (Some(code), Some(hash)) => self.verify_password(code, hash)?,
            _ => false,
        };

        if !verified {
            return Err(OpenAttendanceError::Authentication(
                "recovery verification failed".to_string(),
            ));
        }

        let new_hash = self.hash_password(new_password)?;
        self.staff_repository.update_password_hash(&login.staff_id, &new_hash).await?;
        info!(staff_id = %login.staff_id, "Password recovered");
        Ok(())
    }

    /// Whether the first-run admin registration is still open
    pub async fn registration_open(&self) -> Result<bool> {
        Ok(!self.staff_repository.admin_login_exists().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn test_service() -> AuthService {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "unit-test-secret-key".to_string();
        settings.auth.bcrypt_cost = 4; // keep tests fast
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/openattendance_test")
            .expect("lazy pool");
        AuthService::new(StaffRepository::new(pool), settings)
    }

    fn test_staff() -> Staff {
        Staff {
            id: 1,
            staff_id: "T-100".into(),
            name: "Test Teacher".into(),
            phone_number: None,
            email_address: None,
            staff_type: "teacher".into(),
            teacher_type: None,
            adviser_unit: None,
            profile_image_path: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_hash_and_verify_password() {
        let service = test_service();
        let hash = service.hash_password("correct horse battery").unwrap();
        assert!(service.verify_password("correct horse battery", &hash).unwrap());
        assert!(!service.verify_password("wrong password", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let service = test_service();
        assert!(service.hash_password("short").is_err());
    }

    #[tokio::test]
    async fn test_token_round_trip() {
        let service = test_service();
        let token = service.issue_token(&test_staff()).unwrap();
        let context = service.verify_token(&token).unwrap();
        assert_eq!(context.staff_id, "T-100");
        assert_eq!(context.staff_type, "teacher");
        assert!(!context.is_admin());
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let service = test_service();
        let token = service.issue_token(&test_staff()).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.verify_token(&tampered).is_err());
    }

    #[tokio::test]
    async fn test_prepare_credentials_hashes_secrets() {
        let service = test_service();
        let request = CreateLoginRequest {
            username: "teacher1".into(),
            password: "longenoughpw".into(),
            security_question: Some("First pet?".into()),
            security_answer: Some("  Rex ".into()),
        };
        let (creds, recovery_code) = service.prepare_credentials(&request).unwrap();
        assert_ne!(creds.password_hash, "longenoughpw");
        // answer is normalized before hashing
        assert!(service
            .verify_password("rex", creds.security_answer_hash.as_deref().unwrap())
            .unwrap());
        assert!(service
            .verify_password(&recovery_code, creds.recovery_code_hash.as_deref().unwrap())
            .unwrap());
    }
}
