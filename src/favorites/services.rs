use tracing::{debug, warn};

use super::repo::FavoriteRepo;
use crate::{
    catalog::{Book, VectorCatalog},
    error::AppError,
};

/// Resolves a user's favorites against the catalog, one lookup per row.
///
/// Favorites whose book is no longer in the catalog are skipped; a catalog
/// failure aborts the whole enrichment.
pub async fn enrich_favorites(
    favorites: &dyn FavoriteRepo,
    catalog: &dyn VectorCatalog,
    user_id: i64,
) -> Result<Vec<Book>, AppError> {
    let book_ids = favorites.list_book_ids(user_id).await?;
    let mut books = Vec::with_capacity(book_ids.len());
    for book_id in book_ids {
        match catalog.get(&book_id).await? {
            Some(book) => books.push(book),
            None => warn!(user_id, book_id = %book_id, "favorite references missing book"),
        }
    }
    debug!(user_id, count = books.len(), "favorites enriched");
    Ok(books)
}
