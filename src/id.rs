// id.rs
use uuid::Uuid;

use crate::book::BookId;

pub const ID_PREFIX: &str = "id";

/// Returns a fresh book id: the `id` tag followed by a random v4 UUID.
pub fn generate_id() -> BookId {
    format!("{}{}", ID_PREFIX, Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_format() {
        let id = generate_id();
        assert!(id.starts_with(ID_PREFIX));
        let uuid = Uuid::parse_str(&id[ID_PREFIX.len()..]).unwrap();
        assert_eq!(uuid.get_version_num(), 4);
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(generate_id(), generate_id());
    }
}
