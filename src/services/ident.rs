use rand::Rng;

const ID_LENGTH: usize = 12;

/// URL-safe alphabet, 64 symbols
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Generate a collision-resistant short file id.
///
/// No existence check is performed against the store; at 64^12 possible
/// ids the collision risk is accepted.
pub fn new_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_length() {
        assert_eq!(new_id().len(), 12);
    }

    #[test]
    fn test_id_alphabet() {
        let id = new_id();
        assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_ids_are_distinct() {
        let ids: HashSet<String> = (0..1000).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
