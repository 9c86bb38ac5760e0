use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use crate::auth::SessionStore;
use crate::forms::{is_valid_otp, looks_like_email, normalize_phone, Field, FieldErrors, Outcome, Toast};
use crate::graphql::{GraphQlClient, RegisterInput};

/// Minimum wait between two OTP sends to the same number.
pub const OTP_RESEND_COOLDOWN: Duration = Duration::from_secs(60);

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    EnterPhone,
    VerifyOtp,
    Details,
    Done,
}

/// Phone + OTP sign-up, one mutation per step
#[derive(Debug)]
pub struct RegistrationFlow {
    step: RegistrationStep,
    phone: String,
    otp_sent_at: Option<Instant>,
    verification_token: Option<String>,
    errors: FieldErrors,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Default for RegistrationFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationFlow {
    pub fn new() -> Self {
        Self {
            step: RegistrationStep::EnterPhone,
            phone: String::new(),
            otp_sent_at: None,
            verification_token: None,
            errors: FieldErrors::default(),
            full_name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
        }
    }

    pub fn step(&self) -> RegistrationStep {
        self.step
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Time left before another OTP may be requested.
    pub fn resend_wait(&self) -> Duration {
        self.otp_sent_at
            .map(|sent| OTP_RESEND_COOLDOWN.saturating_sub(sent.elapsed()))
            .unwrap_or(Duration::ZERO)
    }

    /// Step 1: validate the number and ask the backend to text a code.
    pub async fn submit_phone(&mut self, raw_phone: &str, client: &GraphQlClient) -> Outcome {
        self.errors = FieldErrors::default();
        let Some(phone) = normalize_phone(raw_phone) else {
            self.errors.insert(Field::Phone, "Enter a valid 10-digit phone number");
            return Outcome::Invalid;
        };
        self.phone = phone;
        self.send_code(client).await
    }

    /// Ask for a new code while on the verification step.
    pub async fn resend(&mut self, client: &GraphQlClient) -> Outcome {
        if self.step != RegistrationStep::VerifyOtp {
            return Outcome::Invalid;
        }
        let wait = self.resend_wait();
        if !wait.is_zero() {
            self.errors
                .insert(Field::Otp, format!("You can request a new code in {}s", wait.as_secs().max(1)));
            return Outcome::Invalid;
        }
        self.send_code(client).await
    }

    async fn send_code(&mut self, client: &GraphQlClient) -> Outcome {
        match client.send_otp(&self.phone).await {
            Ok(true) => {
                info!("OTP sent to {}", mask(&self.phone));
                self.otp_sent_at = Some(Instant::now());
                self.step = RegistrationStep::VerifyOtp;
                Outcome::Advanced
            }
            Ok(false) => Outcome::Failed(Toast {
                title: "Could not send code".to_string(),
                message: "The server did not accept this phone number.".to_string(),
            }),
            Err(err) => {
                warn!("sendOtp failed: {}", err);
                Outcome::Failed(Toast::error("Could not send code", &err))
            }
        }
    }

    /// Step 2: check the code.
    pub async fn submit_otp(&mut self, code: &str, client: &GraphQlClient) -> Outcome {
        self.errors = FieldErrors::default();
        if self.step != RegistrationStep::VerifyOtp {
            return Outcome::Invalid;
        }
        let code = code.trim();
        if !is_valid_otp(code) {
            self.errors.insert(Field::Otp, "Enter the 6-digit code");
            return Outcome::Invalid;
        }

        match client.verify_otp(&self.phone, code).await {
            Ok(token) => {
                self.verification_token = Some(token);
                self.step = RegistrationStep::Details;
                Outcome::Advanced
            }
            Err(err) => {
                warn!("verifyOtp failed: {}", err);
                Outcome::Failed(Toast::error("Verification failed", &err))
            }
        }
    }

    fn validate_details(&mut self) -> bool {
        let mut errors = FieldErrors::default();
        if self.full_name.trim().is_empty() {
            errors.insert(Field::FullName, "Full name is required");
        }
        let email = self.email.trim();
        if !email.is_empty() && !looks_like_email(email) {
            errors.insert(Field::Email, "Enter a valid email address");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(Field::Password, "Password must be at least 8 characters");
        }
        if self.password != self.confirm_password {
            errors.insert(Field::ConfirmPassword, "Passwords do not match");
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Step 3: create the account and sign in.
    pub async fn submit_details(&mut self, client: &GraphQlClient, sessions: &SessionStore) -> Outcome {
        if self.step != RegistrationStep::Details {
            return Outcome::Invalid;
        }
        if !self.validate_details() {
            return Outcome::Invalid;
        }
        let Some(verification_token) = self.verification_token.clone() else {
            self.step = RegistrationStep::EnterPhone;
            return Outcome::Invalid;
        };

        let email = self.email.trim();
        let input = RegisterInput {
            phone: self.phone.clone(),
            verification_token,
            full_name: self.full_name.trim().to_string(),
            email: (!email.is_empty()).then(|| email.to_string()),
            password: self.password.clone(),
        };

        let payload = match client.register(&input).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!("register failed: {}", err);
                return Outcome::Failed(Toast::error("Registration failed", &err));
            }
        };

        match sessions.login(payload).await {
            Ok(session) => {
                client.set_token(Some(session.access_token.clone()));
                self.step = RegistrationStep::Done;
                self.password.clear();
                self.confirm_password.clear();
                Outcome::Navigate("/".to_string())
            }
            Err(err) => Outcome::Failed(Toast::error("Registration failed", &err)),
        }
    }
}

/// `98******78`
fn mask(phone: &str) -> String {
    phone
        .chars()
        .enumerate()
        .map(|(i, c)| if i < 2 || i + 2 >= phone.len() { c } else { '*' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_hides_middle_digits() {
        assert_eq!(mask("9812345678"), "98******78");
    }

    #[test]
    fn details_validation() {
        let mut flow = RegistrationFlow::new();
        flow.full_name = " ".into();
        flow.email = "not-an-email".into();
        flow.password = "short".into();
        flow.confirm_password = "different".into();
        assert!(!flow.validate_details());
        assert_eq!(flow.errors().len(), 4);

        flow.full_name = "Hari Thapa".into();
        flow.email = String::new();
        flow.password = "long-enough".into();
        flow.confirm_password = "long-enough".into();
        assert!(flow.validate_details());
    }

    #[test]
    fn no_cooldown_before_first_send() {
        assert_eq!(RegistrationFlow::new().resend_wait(), Duration::ZERO);
    }
}
