use crate::auth::session::Session;
use crate::models::{Role, User};

/// Where an unauthorized visitor is sent instead of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    SignIn { return_to: String },
    AccessDenied,
}

impl Redirect {
    pub fn path(&self) -> String {
        match self {
            Self::SignIn { return_to } => format!("/signin?next={}", encode_path(return_to)),
            Self::AccessDenied => "/access-denied".to_string(),
        }
    }
}

fn encode_path(path: &str) -> String {
    url::form_urlencoded::byte_serialize(path.as_bytes()).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Granted(User),
    Redirect(Redirect),
}

/// Gate a page. `roles` empty means any signed-in user; admins pass every gate.
pub fn require(session: Option<&Session>, roles: &[Role], return_to: &str) -> Access {
    let Some(session) = session else {
        return Access::Redirect(Redirect::SignIn {
            return_to: return_to.to_string(),
        });
    };

    let user = &session.user;
    if roles.is_empty() || user.role == Role::Admin || roles.contains(&user.role) {
        Access::Granted(user.clone())
    } else {
        Access::Redirect(Redirect::AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn session(role: Role) -> Session {
        Session {
            access_token: SecretString::from("t".to_string()),
            refresh_token: None,
            user: User {
                id: "u".into(),
                full_name: "Ram".into(),
                phone: None,
                email: None,
                role,
            },
        }
    }

    #[test]
    fn anonymous_goes_to_sign_in() {
        let access = require(None, &[Role::Agent], "/properties/new");
        let Access::Redirect(redirect) = access else {
            panic!("expected redirect");
        };
        assert_eq!(redirect.path(), "/signin?next=%2Fproperties%2Fnew");
    }

    #[test]
    fn wrong_role_is_denied_and_admin_passes() {
        let buyer = session(Role::Buyer);
        assert_eq!(
            require(Some(&buyer), &[Role::Agent], "/properties/new"),
            Access::Redirect(Redirect::AccessDenied)
        );

        let admin = session(Role::Admin);
        assert!(matches!(require(Some(&admin), &[Role::Agent], "/x"), Access::Granted(_)));
        assert!(matches!(require(Some(&buyer), &[], "/x"), Access::Granted(_)));
    }
}
