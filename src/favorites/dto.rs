use serde::{Deserialize, Serialize};

use crate::catalog::Book;

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub book_id: String,
}

#[derive(Debug, Serialize)]
pub struct IsFavoriteResponse {
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<Book>,
}
