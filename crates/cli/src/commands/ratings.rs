//! `sr-cli ratings ...`

use store_ratings_core::validation::validate_rating;
use store_ratings_core::{Rating, RatingCreate, StoreId};

use super::{CliError, Client, star_text};

/// One rating line: id, store, author, stars, date and comment.
pub fn summary(rating: &Rating) -> String {
    let value = rating.rating.get();
    let mut line = format!(
        "#{:<3} store #{:<3} user #{:<3} {} {} {}",
        rating.id.as_i32(),
        rating.store_id.as_i32(),
        rating.user_id.as_i32(),
        star_text(f64::from(value)),
        rating.rating.label(),
        rating.created_at.format("%Y-%m-%d")
    );
    if let Some(comment) = &rating.comment {
        line.push_str(&format!("  \"{comment}\""));
    }
    line
}

/// # Errors
///
/// Returns `CliError::Api` if the request fails.
pub async fn for_store(client: &Client, store_id: StoreId) -> Result<String, CliError> {
    let ratings = client.stores().ratings(store_id).await?;
    if ratings.is_empty() {
        return Ok(format!("Store #{store_id} has no ratings yet"));
    }
    Ok(ratings.iter().map(summary).collect::<Vec<_>>().join("\n"))
}

/// Rate a store as the logged-in user, replacing any earlier rating.
///
/// # Errors
///
/// Returns `CliError::Invalid` without sending anything when `value` is
/// outside 1 to 5, `CliError::NotLoggedIn` without a session, or
/// `CliError::Api` when the server rejects the rating.
pub async fn rate(
    client: &Client,
    store_id: StoreId,
    value: i64,
    comment: Option<String>,
) -> Result<String, CliError> {
    let value = validate_rating(value).map_err(CliError::Invalid)?;
    if !client.auth().is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }

    let rating = client
        .ratings()
        .submit(&RatingCreate {
            store_id,
            rating: i64::from(value.get()),
            comment,
        })
        .await?;
    Ok(format!(
        "Rated store #{store_id} {} ({})",
        star_text(f64::from(rating.rating.get())),
        rating.rating.label()
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rating(comment: Option<&str>) -> Rating {
        serde_json::from_value(json!({
            "id": 4,
            "storeId": 2,
            "userId": 9,
            "rating": 4,
            "comment": comment,
            "createdAt": "2024-03-05T10:00:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_with_comment() {
        let line = summary(&rating(Some("Always fresh produce.")));
        assert!(line.starts_with("#4   store #2   user #9"));
        assert!(line.contains("★★★★☆ Very Good"));
        assert!(line.contains("2024-03-05"));
        assert!(line.ends_with("\"Always fresh produce.\""));
    }

    #[test]
    fn test_summary_without_comment() {
        let line = summary(&rating(None));
        assert!(line.ends_with("2024-03-05"));
    }
}
