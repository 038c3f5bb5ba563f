//! Random password generator for new vault entries.

use rand::Rng;

/// Characters a generated password is drawn from.
pub const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()";

/// Default generated password length.
pub const DEFAULT_LENGTH: usize = 12;

/// Generate a random password of `len` characters from `CHARSET`.
pub fn generate_password(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
