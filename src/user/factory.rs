//! Test-data factory producing valid [`User`] fixtures.

use fake::Fake;
use fake::faker::internet::raw::{Password, SafeEmail};
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::distributions::{Alphanumeric, DistString};
use rand::rngs::OsRng;

use crate::user::{User, UserService};

/// Random alphanumeric string.
pub fn random_string(length: usize) -> String {
    Alphanumeric.sample_string(&mut OsRng, length)
}

/// Random display name, first name followed by last name.
pub fn name() -> String {
    let first: String = FirstName(EN).fake();
    let last: String = LastName(EN).fake();
    format!("{first} {last}")
}

/// Random, well-formed email.
///
/// The local part is salted so two calls in one test never collide.
pub fn email() -> String {
    let email: String = SafeEmail(EN).fake();
    format!("{}.{email}", random_string(6).to_lowercase())
}

/// Random password.
pub fn password() -> String {
    Password(EN, 12..24).fake()
}

/// Valid user attributes, persisted with [`UserFactory::create`].
#[derive(Debug, Clone)]
pub struct UserFactory {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Start a new [`UserFactory`] with random attributes.
pub fn user() -> UserFactory {
    UserFactory {
        name: name(),
        email: email(),
        password: password(),
    }
}

impl UserFactory {
    /// Update `email` of [`UserFactory`].
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Save the user through `service`.
    pub async fn create(self, service: &UserService) -> User {
        service
            .store(Some(self.name), Some(self.email), Some(self.password))
            .await
            .expect("factory user must be valid")
    }
}
