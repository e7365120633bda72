//! `sr-cli stores ...`

use store_ratings_core::validation::{StoreDraft, validate_store};
use store_ratings_core::{Store, StoreCreate, StoreId, UserId};

use super::{CliError, Client, ensure_valid, star_text};

/// One listing line: id, name, category, stars, average and count.
pub fn summary(store: &Store) -> String {
    format!(
        "#{:<3} {:<28} {:<16} {} {:.1} ({})",
        store.id.as_i32(),
        store.name,
        store.category.name(),
        star_text(store.avg_rating),
        store.avg_rating,
        store.total_ratings
    )
}

fn details(store: &Store) -> String {
    let mut lines = vec![
        store.name.clone(),
        format!("Category: {}", store.category.name()),
        format!("Address:  {}", store.address),
    ];
    if !store.phone.is_empty() {
        lines.push(format!("Phone:    {}", store.phone));
    }
    if !store.website.is_empty() {
        lines.push(format!("Website:  {}", store.website));
    }
    lines.push(format!("Owner ID: {}", store.owner_id));
    lines.push(format!(
        "Rating:   {} {:.1} from {} ratings",
        star_text(store.avg_rating),
        store.avg_rating,
        store.total_ratings
    ));
    lines.join("\n")
}

/// # Errors
///
/// Returns `CliError::Api` if the request fails.
pub async fn list(client: &Client, search: Option<&str>) -> Result<String, CliError> {
    let stores = client.stores().list(search).await?;
    if stores.is_empty() {
        return Ok("No stores found".to_string());
    }
    Ok(stores.iter().map(summary).collect::<Vec<_>>().join("\n"))
}

/// # Errors
///
/// Returns `CliError::Api` (404) for an unknown store.
pub async fn show(client: &Client, id: StoreId) -> Result<String, CliError> {
    let store = client.stores().get(id).await?;
    Ok(details(&store))
}

/// Validate locally, then create the store. Requires an admin login.
///
/// Whether the owner really is a store owner is left to the server.
///
/// # Errors
///
/// Returns `CliError::Invalid` without sending anything when a field fails
/// validation, or `CliError::Api` when the server rejects the store.
pub async fn create(client: &Client, store: StoreCreate) -> Result<String, CliError> {
    ensure_valid(validate_store(
        &StoreDraft {
            name: &store.name,
            address: &store.address,
            category: &store.category,
            owner_id: store.owner_id,
        },
        |_: UserId| true,
    ))?;

    let created = client.stores().create(&store).await?;
    tracing::info!(store_id = %created.id, "Store created");
    Ok(format!("Created store #{}: {}", created.id, created.name))
}

/// # Errors
///
/// Returns `CliError::Api` if the request is rejected.
pub async fn delete(client: &Client, id: StoreId) -> Result<String, CliError> {
    client.stores().delete(id).await?;
    Ok(format!("Deleted store #{id}"))
}
