use serde::{Deserialize, Serialize};

/// Catalog item returned by the book-info service.
///
/// Constructed only by deserializing the downstream `/getbooks` response and
/// discarded once the request completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// 64-bit identifier, unique within a response batch
    pub isbn: i64,
    /// Title of the book
    pub title: String,
    /// Short description of the book
    pub synopsis: String,
    /// Author of the book
    pub authorname: String,
    /// List price
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_downstream_shape() {
        let raw = r#"{
            "isbn": 9781718503106,
            "title": "The Rust Programming Language",
            "synopsis": "The official book on Rust.",
            "authorname": "Steve Klabnik",
            "price": 39.99
        }"#;

        let book: Book = serde_json::from_str(raw).unwrap();
        assert_eq!(book.isbn, 9781718503106);
        assert_eq!(book.authorname, "Steve Klabnik");
    }
}
