use chrono::Utc;
use uuid::Uuid;

/// Source of per-request nonces.
///
/// Implementations must produce values that are effectively unique across
/// concurrent clients; the default draws 128 bits of randomness per nonce.
/// Swap in a fixed source only for deterministic tests.
pub trait NonceSource: Send + Sync {
    fn generate(&self) -> String;
}

/// Source of `oauth_timestamp` values, read fresh per call.
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch.
    fn unix_timestamp(&self) -> i64;
}

/// Default nonce source backed by v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomNonce;

impl NonceSource for RandomNonce {
    fn generate(&self) -> String {
        format!("{}", Uuid::new_v4())
    }
}

/// Default clock reading the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_timestamp(&self) -> i64 {
        Utc::now().timestamp()
    }
}
