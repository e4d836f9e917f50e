// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
/** Bearer token generation.
Tokens are raw OS-seeded random bytes rendered as lowercase hex. */
use rand::RngCore;

/// Token size in bytes (20 bytes = 160 bits of entropy, 40 hex chars)
pub const TOKEN_BYTES: usize = 20;

/** Generate a bearer token of [`TOKEN_BYTES`] random bytes
# Returns
A lowercase hex string twice as long as the byte count */
pub fn generate_token() -> String {
    generate_token_with_size(TOKEN_BYTES)
}

/** Generate a hex token from `bytes` random bytes */
pub fn generate_token_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buffer);
    hex::encode(buffer)
}
