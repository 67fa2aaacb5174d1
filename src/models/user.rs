use serde::{Deserialize, Serialize};

/// An authenticated user as reported by the identity service.
///
/// The core only consumes presence or absence of a user; identity logic
/// (credentials, tokens, refresh) stays inside the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Identity-service-assigned unique id
    pub uid: String,
    pub email: String,
}
