//! # Ticket Codec Testing
//!
//! Testing utilities and helpers for the ticket codec.
//!
//! This crate provides:
//! - Key material and sample records ([`fixtures`])
//! - Mock implementations of environment traits and a counting keyed hash ([`mocks`])
//! - Property-based testing strategies ([`properties`])
//! - A Given-When-Then scenario runner ([`CodecTest`])
//!
//! ## Example
//!
//! ```
//! use ticket_codec_testing::fixtures::{TestKeys, sample_record, normalized};
//!
//! let keys = TestKeys::generate();
//! let codec = keys.codec();
//! let code = codec.generate(&sample_record()).unwrap();
//! assert_eq!(codec.decode(&code), Some(normalized(sample_record())));
//! ```

use chrono::{DateTime, Utc};
use ticket_codec_core::environment::Clock;

pub mod fixtures;

pub use codec_test::CodecTest;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use ticket_codec_core::keyed_hash::{Digest, HmacSha256Key, KeyedHash};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ticket_codec_testing::mocks::FixedClock;
    /// use ticket_codec_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }

        /// A clock `delta` later than this one
        #[must_use]
        pub fn advanced(&self, delta: chrono::Duration) -> Self {
            Self::new(self.time + delta)
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// HMAC-SHA-256 that counts its invocations.
    ///
    /// Clones share the counter, so a handle kept by the test observes calls
    /// made by a codec that owns another clone.
    #[derive(Debug, Clone)]
    pub struct CountingHasher {
        inner: HmacSha256Key,
        calls: Arc<AtomicUsize>,
    }

    impl CountingHasher {
        /// Wrap an imported key
        #[must_use]
        pub fn new(inner: HmacSha256Key) -> Self {
            Self {
                inner,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Number of digests computed so far
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Reset the counter to zero
        pub fn reset(&self) {
            self.calls.store(0, Ordering::SeqCst);
        }
    }

    impl KeyedHash for CountingHasher {
        fn digest(&self, message: &[u8]) -> Digest {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.digest(message)
        }
    }
}

/// Property-based testing strategies using proptest.
pub mod properties {
    use proptest::prelude::*;
    use ticket_codec_core::TicketRecord;

    /// Valid 4-digit affiliations (grade 1-4, class 1-8, number 1-64).
    pub fn arb_affiliation() -> impl Strategy<Value = u16> {
        (1u16..=4, 1u16..=8, 1u16..=64).prop_map(|(grade, class, number)| {
            grade * 1000 + class * 100 + number
        })
    }

    /// In-range records with calendar-style years.
    pub fn arb_ticket_record() -> impl Strategy<Value = TicketRecord> {
        (
            arb_affiliation(),
            0u8..8,
            0u8..16,
            0u8..32,
            0u8..64,
            0u16..3000,
            0u8..16,
        )
            .prop_map(
                |(affiliation, relationship, ticket_type, performance, schedule, year, serial)| {
                    TicketRecord {
                        affiliation,
                        relationship,
                        ticket_type,
                        performance,
                        schedule,
                        year,
                        serial,
                    }
                },
            )
    }

    /// Affiliations whose grade, class or number is out of range.
    pub fn arb_invalid_affiliation() -> impl Strategy<Value = u16> {
        any::<u16>().prop_filter("affiliation must be invalid", |a| {
            let (grade, class, number) = (a / 1000, a / 100 % 10, a % 100);
            !((1..=4).contains(&grade) && (1..=8).contains(&class) && (1..=64).contains(&number))
        })
    }
}

/// Install a tracing subscriber that writes through the test harness.
///
/// Honors `RUST_LOG`. Safe to call from every test; only the first call
/// installs the subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{CountingHasher, FixedClock, test_clock};
