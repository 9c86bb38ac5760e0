use tracing::warn;

use crate::auth::SessionStore;
use crate::forms::{looks_like_email, normalize_phone, Field, FieldErrors, Outcome, Toast};
use crate::graphql::GraphQlClient;

/// Phone-or-email + password sign-in
#[derive(Debug, Default)]
pub struct SignInForm {
    pub identifier: String,
    pub password: String,
    /// Where to go after signing in; defaults to the home page
    pub return_to: Option<String>,
    errors: FieldErrors,
}

impl SignInForm {
    pub fn new(return_to: Option<String>) -> Self {
        Self {
            return_to,
            ..Self::default()
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Phone numbers are sent normalized; emails as typed.
    fn identifier_for_backend(&self) -> Option<String> {
        let raw = self.identifier.trim();
        if looks_like_email(raw) {
            return Some(raw.to_string());
        }
        normalize_phone(raw)
    }

    pub async fn submit(&mut self, client: &GraphQlClient, sessions: &SessionStore) -> Outcome {
        self.errors = FieldErrors::default();
        let identifier = self.identifier_for_backend();
        if identifier.is_none() {
            self.errors.insert(Field::Identifier, "Enter your phone number or email");
        }
        if self.password.is_empty() {
            self.errors.insert(Field::Password, "Password is required");
        }
        let Some(identifier) = identifier.filter(|_| self.errors.is_empty()) else {
            return Outcome::Invalid;
        };

        let payload = match client.sign_in(&identifier, &self.password).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!("signIn failed: {}", err);
                return Outcome::Failed(Toast::error("Sign in failed", &err));
            }
        };

        match sessions.login(payload).await {
            Ok(session) => {
                client.set_token(Some(session.access_token.clone()));
                self.password.clear();
                Outcome::Navigate(self.return_to.clone().unwrap_or_else(|| "/".to_string()))
            }
            Err(err) => Outcome::Failed(Toast::error("Sign in failed", &err)),
        }
    }
}
