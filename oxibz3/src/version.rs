//! Minimum-version gate for block codecs.
//!
//! Codecs older than [`MIN_PRIMITIVE_VERSION`] produce streams that newer
//! decoders cannot read back reliably. By default such a codec is refused
//! when a [`BlockProcessor`](crate::BlockProcessor) is built around it. A
//! program that must keep working with one can call [`configure`] once at
//! startup with [`VersionPolicy::Warn`].

use oxibz3_core::{Bz3Error, Result, Version};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Oldest codec version accepted without an explicit override.
pub const MIN_PRIMITIVE_VERSION: Version = Version::new(1, 3, 2);

/// What to do with a codec older than [`MIN_PRIMITIVE_VERSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    /// Fail with [`Bz3Error::IncompatibleVersion`].
    #[default]
    Refuse,
    /// Log a warning and carry on.
    Warn,
}

static POLICY: OnceLock<VersionPolicy> = OnceLock::new();
static WARNED: AtomicBool = AtomicBool::new(false);

/// Set the process-wide policy.
///
/// Only the first call has an effect; returns whether this call set it.
pub fn configure(policy: VersionPolicy) -> bool {
    POLICY.set(policy).is_ok()
}

/// The policy in force.
pub fn policy() -> VersionPolicy {
    POLICY.get().copied().unwrap_or_default()
}

/// Check `found` against the process-wide policy.
pub fn check(found: Version) -> Result<()> {
    check_with(found, policy())
}

/// Check `found` against an explicit policy.
pub fn check_with(found: Version, policy: VersionPolicy) -> Result<()> {
    if found >= MIN_PRIMITIVE_VERSION {
        return Ok(());
    }
    match policy {
        VersionPolicy::Refuse => Err(Bz3Error::incompatible_version(
            found,
            MIN_PRIMITIVE_VERSION,
        )),
        VersionPolicy::Warn => {
            if !WARNED.swap(true, Ordering::Relaxed) {
                warn!(
                    %found,
                    minimum = %MIN_PRIMITIVE_VERSION,
                    "block codec is older than the minimum supported version; \
                     streams it writes may not be readable by newer decoders"
                );
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_codec_passes() {
        assert!(check_with(oxibz3_block::CODEC_VERSION, VersionPolicy::Refuse).is_ok());
        assert!(check_with(MIN_PRIMITIVE_VERSION, VersionPolicy::Refuse).is_ok());
    }

    #[test]
    fn test_old_codec_refused() {
        let err = check_with(Version::new(1, 3, 1), VersionPolicy::Refuse).unwrap_err();
        match err {
            Bz3Error::IncompatibleVersion { found, minimum } => {
                assert_eq!(found, "1.3.1");
                assert_eq!(minimum, "1.3.2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_old_codec_warned() {
        assert!(check_with(Version::new(1, 0, 0), VersionPolicy::Warn).is_ok());
        assert!(check_with(Version::new(1, 0, 0), VersionPolicy::Warn).is_ok());
    }

    #[test]
    fn test_default_policy_is_refuse() {
        assert_eq!(VersionPolicy::default(), VersionPolicy::Refuse);
    }
}
