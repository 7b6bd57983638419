//! Visitor id derivation
//!
//! A non-cryptographic, collision-prone identifier: the classic 32-bit
//! rolling multiplicative hash over a deterministic serialization of the
//! attribute tuple. Suitable for low-stakes deduplication only; anything
//! security-critical must not trust it.

use super::env::ClientEnv;

/// Derive the visitor id for an environment
///
/// Identical environments (including probe outputs) always produce the
/// same id.
pub fn visitor_id(env: &ClientEnv) -> String {
    format!("{:x}", rolling_hash(&serialize(env)).unsigned_abs())
}

/// Serialize the twelve attributes in fixed key order
///
/// The order is part of the id contract; reordering fields here changes
/// every visitor id in the wild.
fn serialize(env: &ClientEnv) -> String {
    let a = &env.attrs;
    format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
        a.user_agent,
        a.language,
        a.screen,
        a.timezone,
        a.timezone_offset_min,
        a.platform,
        a.hardware_concurrency,
        a.device_memory_gb,
        a.cookies_enabled,
        a.local_storage,
        env.gpu_renderer,
        env.canvas_hash,
    )
}

/// `h = h*31 + unit` over UTF-16 code units, wrapping in i32
fn rolling_hash(s: &str) -> i32 {
    let mut hash: i32 = 0;
    for unit in s.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::env::EnvAttributes;

    fn sample_env() -> ClientEnv {
        ClientEnv::new(
            EnvAttributes {
                user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)".to_string(),
                language: "en-US".to_string(),
                screen: "2560x1440".to_string(),
                timezone: "Europe/Amsterdam".to_string(),
                timezone_offset_min: -120,
                platform: "MacIntel".to_string(),
                hardware_concurrency: 10,
                device_memory_gb: 16.0,
                cookies_enabled: true,
                local_storage: true,
            },
            "Apple M1 Pro".to_string(),
            "data:image/png;base64,iVBOR".to_string(),
        )
    }

    #[test]
    fn identical_envs_hash_identically() {
        assert_eq!(visitor_id(&sample_env()), visitor_id(&sample_env()));
    }

    #[test]
    fn any_attribute_change_changes_the_id() {
        let base = visitor_id(&sample_env());

        let mut env = sample_env();
        env.attrs.screen = "1920x1080".to_string();
        assert_ne!(visitor_id(&env), base);

        let mut env = sample_env();
        env.canvas_hash.clear();
        assert_ne!(visitor_id(&env), base);
    }

    #[test]
    fn id_is_lowercase_hex() {
        let id = visitor_id(&sample_env());
        assert!(!id.is_empty());
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn rolling_hash_matches_reference_values() {
        // h("a") = 97, h("ab") = 97*31 + 98
        assert_eq!(rolling_hash("a"), 97);
        assert_eq!(rolling_hash("ab"), 97 * 31 + 98);
        assert_eq!(rolling_hash(""), 0);
    }

    #[test]
    fn rolling_hash_wraps_instead_of_overflowing() {
        let long = "x".repeat(10_000);
        // Must not panic in debug builds
        let _ = rolling_hash(&long);
    }

    #[test]
    fn non_ascii_hashes_over_utf16_units() {
        // One surrogate pair -> two code units
        assert_eq!(
            rolling_hash("\u{1F600}"),
            {
                let mut h: i32 = 0;
                for unit in "\u{1F600}".encode_utf16() {
                    h = h.wrapping_mul(31).wrapping_add(i32::from(unit));
                }
                h
            }
        );
        assert_ne!(rolling_hash("é"), rolling_hash("e"));
    }
}
