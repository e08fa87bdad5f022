//! Opaque ID generation for rooms and host secrets.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Produces short random identifiers.
///
/// Used for both room IDs and host secrets, so implementations must be
/// unpredictable in production. Tests swap in deterministic generators.
pub trait IdGenerator: Send + Sync + 'static {
    /// Returns a new identifier of `len` characters.
    fn generate(&self, len: usize) -> String;
}

impl IdGenerator for Box<dyn IdGenerator> {
    fn generate(&self, len: usize) -> String {
        (**self).generate(len)
    }
}

/// Alphanumeric IDs from the thread-local CSPRNG.
///
/// At the default length of 11, each ID carries about 65 bits of
/// entropy (62 symbols per character).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn generate(&self, len: usize) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}
