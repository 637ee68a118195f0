use argon2::Config;

pub fn encode_password(password: &str) -> Result<String, argon2::Error> {
    let config = Config::default();
    let salt: [u8; 32] = rand::random();
    let password_hash = argon2::hash_encoded(password.as_bytes(), &salt, &config)?;
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, argon2::Error> {
    argon2::verify_encoded(password_hash, password.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::{encode_password, verify_password};

    #[test]
    fn hash_and_verify() {
        let hash = encode_password("testpass123").unwrap();
        assert_ne!(hash, "testpass123");
        assert!(verify_password("testpass123", &hash).unwrap());
        assert!(!verify_password("wrongpass", &hash).unwrap());
    }

    #[test]
    fn salts_differ() {
        let first = encode_password("testpass123").unwrap();
        let second = encode_password("testpass123").unwrap();
        assert_ne!(first, second);
    }
}
