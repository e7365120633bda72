//! Session commands: login, register, logout, whoami.

use secrecy::{ExposeSecret, SecretString};

use store_ratings_core::RegisterRequest;
use store_ratings_core::session::SessionUser;
use store_ratings_core::validation::{FormMode, UserDraft, validate_user};

use super::{CliError, Client, ensure_valid};

/// Arguments of `sr-cli register`.
pub struct Registration {
    pub name: String,
    pub email: String,
    pub address: String,
    pub password: SecretString,
}

fn describe(user: &SessionUser) -> String {
    let mut text = format!(
        "{} <{}>\nRole: {}\nUser ID: {}",
        user.name,
        user.email,
        user.role.label(),
        user.id
    );
    if let Some(store_id) = user.store_id {
        text.push_str(&format!("\nStore ID: {store_id}"));
    }
    text
}

/// Log in and keep the session on disk.
///
/// # Errors
///
/// Returns `CliError::Api` for bad credentials or an unreachable server.
pub async fn login(
    client: &Client,
    email: &str,
    password: &SecretString,
) -> Result<String, CliError> {
    let user = client.auth().login(email, password).await?;
    tracing::info!(user_id = %user.id, "Logged in");
    Ok(format!("Logged in as {} ({})", user.name, user.role.label()))
}

/// Validate locally, then create a `user` account and log in.
///
/// # Errors
///
/// Returns `CliError::Invalid` without sending anything when a field fails
/// validation, or `CliError::Api` when the server rejects the account.
pub async fn register(client: &Client, registration: Registration) -> Result<String, CliError> {
    let password = registration.password.expose_secret();
    ensure_valid(validate_user(
        &UserDraft {
            name: &registration.name,
            email: registration.email.trim(),
            address: &registration.address,
            password: Some(password),
        },
        FormMode::Create,
    ))?;

    let request = RegisterRequest {
        name: registration.name.clone(),
        email: registration.email.trim().to_string(),
        password: password.to_string(),
        address: registration.address.clone(),
        role: None,
    };
    let user = client.auth().register(&request).await?;
    Ok(format!("Account created. Logged in as {}", user.name))
}

/// Revoke the token on the server and forget the stored session.
///
/// # Errors
///
/// Returns `CliError::Api` if the server refuses the revocation or the
/// session file cannot be written. The local session is cleared either way.
pub async fn logout(client: &Client) -> Result<String, CliError> {
    client.auth().logout().await?;
    Ok("Logged out".to_string())
}

/// Show the stored session user.
///
/// # Errors
///
/// Returns `CliError::NotLoggedIn` when no session is stored.
pub fn whoami(client: &Client) -> Result<String, CliError> {
    client
        .auth()
        .current_user()
        .map(|user| describe(&user))
        .ok_or(CliError::NotLoggedIn)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use store_ratings_core::{Email, Role, StoreId, UserId};

    #[test]
    fn test_describe_store_owner() {
        let user = SessionUser {
            id: UserId::new(16),
            name: "Demonstration Store Owner".to_string(),
            email: Email::parse("store@example.com").unwrap(),
            role: Role::StoreOwner,
            store_id: Some(StoreId::new(1)),
        };
        let text = describe(&user);
        assert!(text.starts_with("Demonstration Store Owner <store@example.com>"));
        assert!(text.contains("Role: Store Owner"));
        assert!(text.ends_with("Store ID: 1"));
    }
}
