//! Credential check

use crate::user::User;

/// Find the user whose email and password both match exactly.
///
/// Accounts without a stored password can never log in.
pub fn authenticate<'a>(users: &'a [User], email: &str, password: &str) -> Option<&'a User> {
    let found = users
        .iter()
        .find(|u| u.email == email && u.password.as_deref() == Some(password));

    match found {
        Some(user) => tracing::info!(user_id = %user.id, role = %user.role, "Login succeeded"),
        None => tracing::info!(email = %email, "Login rejected"),
    }

    found
}
