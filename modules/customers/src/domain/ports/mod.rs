/// Output port: password hashing behind an opaque call contract.
///
/// `secondary_key` is a fixed legacy compatibility secret mixed into the
/// digest so existing login paths keep verifying.
pub trait PasswordHasher: Send + Sync + 'static {
    fn hash(&self, plaintext: &str, secondary_key: &str) -> String;
}
