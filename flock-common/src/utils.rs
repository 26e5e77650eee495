use openssl::rand::rand_bytes;

/// Generates an hexadecimal representation of 32 bytes of random data
pub fn random_hex() -> String {
    let mut bytes = [0; 32];
    rand_bytes(&mut bytes).expect("Error while generating random token");
    hex::encode(bytes)
}

/// Checks that a username only contains letters and digits.
pub fn valid_username(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_hex() {
        let a = random_hex();
        let b = random_hex();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_valid_username() {
        assert!(valid_username("jane42"));
        assert!(!valid_username(""));
        assert!(!valid_username("jane doe"));
        assert!(!valid_username("jane@doe"));
    }
}
