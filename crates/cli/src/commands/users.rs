//! `sr-cli users ...`

use store_ratings_core::{User, UserId};

use super::{CliError, Client};

fn summary(user: &User) -> String {
    format!(
        "#{:<3} {:<32} {:<30} {:<12} rated {}",
        user.id.as_i32(),
        user.name,
        user.email,
        user.role.label(),
        user.stores_rated
    )
}

/// # Errors
///
/// Returns `CliError::Api` if the request fails.
pub async fn list(client: &Client, search: Option<&str>) -> Result<String, CliError> {
    let users = client.users().list(search).await?;
    if users.is_empty() {
        return Ok("No users found".to_string());
    }
    Ok(users.iter().map(summary).collect::<Vec<_>>().join("\n"))
}

/// A user with the ratings they submitted.
///
/// # Errors
///
/// Returns `CliError::Api` (404) for an unknown user.
pub async fn show(client: &Client, id: UserId) -> Result<String, CliError> {
    let user = client.users().get(id).await?;
    let ratings = client.users().ratings(id).await?;

    let mut lines = vec![
        format!("{} <{}>", user.name, user.email),
        format!("Role:    {}", user.role.label()),
        format!("Address: {}", user.address),
        format!("Stores rated: {}", user.stores_rated),
    ];
    lines.extend(ratings.iter().map(super::ratings::summary));
    Ok(lines.join("\n"))
}

/// Delete a user and their ratings. Requires an admin login.
///
/// # Errors
///
/// Returns `CliError::Api` if the request is rejected.
pub async fn delete(client: &Client, id: UserId) -> Result<String, CliError> {
    client.users().delete(id).await?;
    Ok(format!("Deleted user #{id}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use store_ratings_core::{Email, Role};

    #[test]
    fn test_summary_line() {
        let user = User {
            id: UserId::new(17),
            name: "Demonstration Shopper Account".to_string(),
            email: Email::parse("user@example.com").unwrap(),
            address: String::new(),
            role: Role::User,
            stores_rated: 3,
        };
        let line = summary(&user);
        assert!(line.starts_with("#17  Demonstration Shopper Account"));
        assert!(line.ends_with("rated 3"));
    }
}
