use serde::{Deserialize, Serialize};

/// Fixed Old/New partition. Book numbers 1-39 are Old Testament, 40-66 New.
/// The threshold is translation-agnostic by construction; translations with
/// non-standard book ordering would misclassify (known limitation, kept).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Testament {
    Old,
    New,
}

impl Testament {
    pub fn of_book(book_number: i32) -> Self {
        if book_number <= 39 {
            Testament::Old
        } else {
            Testament::New
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Testament::Old => "OLD",
            Testament::New => "NEW",
        }
    }

    pub fn from_str_or_book(s: &str, book_number: i32) -> Self {
        match s {
            "OLD" => Testament::Old,
            "NEW" => Testament::New,
            _ => Testament::of_book(book_number),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub translation: String,
    pub book_number: i32,
    pub name: String,
    pub chapters: i32,
    pub testament: Testament,
    pub cached_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testament_partition() {
        assert_eq!(Testament::of_book(1), Testament::Old);
        assert_eq!(Testament::of_book(39), Testament::Old);
        assert_eq!(Testament::of_book(40), Testament::New);
        assert_eq!(Testament::of_book(66), Testament::New);
    }

    #[test]
    fn testament_round_trip() {
        assert_eq!(Testament::from_str_or_book("OLD", 50), Testament::Old);
        assert_eq!(Testament::from_str_or_book("NEW", 3), Testament::New);
        // Unknown strings fall back to the book-number rule.
        assert_eq!(Testament::from_str_or_book("?", 3), Testament::Old);
    }
}
