use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub email: String,
}

/// Login gate. Nothing is verified: any non-empty email and password pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum Session {
    #[default]
    Guest,
    Authenticated(Identity),
}

impl Session {
    /// Moves `Guest` to `Authenticated` when both fields are non-empty.
    ///
    /// Returns the newly authenticated identity, or `None` if the gate stayed
    /// closed or was already open. There is no way back to `Guest`.
    pub fn login(&mut self, email: &str, password: &str) -> Option<&Identity> {
        if self.is_authenticated() || email.is_empty() || password.is_empty() {
            return None;
        }

        *self = Session::Authenticated(Identity {
            email: email.to_string(),
        });
        self.identity()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated(identity) => Some(identity),
            Session::Guest => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_with_both_fields() {
        let mut session = Session::default();
        let identity = session.login("a@b.c", "pw").cloned();
        assert_eq!(identity.map(|i| i.email), Some("a@b.c".to_string()));
        assert!(session.is_authenticated());
    }

    #[test]
    fn stays_closed_on_any_empty_field() {
        for (email, password) in [("", "pw"), ("a@b.c", ""), ("", "")] {
            let mut session = Session::default();
            assert!(session.login(email, password).is_none());
            assert_eq!(session, Session::Guest);
        }
    }

    #[test]
    fn is_one_way() {
        let mut session = Session::default();
        session.login("first@b.c", "pw");
        assert!(session.login("second@b.c", "pw").is_none());
        assert!(session.login("", "").is_none());
        assert_eq!(session.identity().map(|i| i.email.as_str()), Some("first@b.c"));
    }
}
