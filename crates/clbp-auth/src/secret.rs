use rand::Rng;
use rand::distributions::Alphanumeric;

const SECRET_LEN: usize = 32;

/// Generate a random alphanumeric signing secret for a fresh install.
pub fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LEN)
        .map(char::from)
        .collect()
}
