//! Property-based tests for the text classification and config validation.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use valctl_cli::domain::account::{
    ABSENT_MARKERS, AccountClassification, AccountKind, classify, excerpt, parse_address,
};
use valctl_cli::domain::config::{VALID_CONFIG_KEYS, validate_config_key};
use valctl_cli::domain::validator::{CAUGHT_UP_MARKER, classify_catchup};
use valctl_cli::domain::{SyncStatus, ValctlConfig};

fn provisioned_kind() -> impl Strategy<Value = AccountKind> {
    prop_oneof![Just(AccountKind::Stake), Just(AccountKind::Vote)]
}

proptest! {
    /// An absent marker anywhere in stderr wins over exit status and wrong-type text.
    #[test]
    fn prop_absent_marker_always_absent(
        kind in provisioned_kind(),
        success in proptest::bool::ANY,
        marker in proptest::sample::select(ABSENT_MARKERS.to_vec()),
        prefix in "[a-zA-Z0-9 :]{0,30}",
        suffix in "[a-zA-Z0-9 :]{0,30}",
    ) {
        let stderr = format!("{prefix}{marker}{suffix}");
        prop_assert_eq!(
            classify(kind, success, &stderr).expect("classified"),
            AccountClassification::Absent
        );
    }

    /// Marker-free stderr is Correct on success and a hard failure otherwise.
    #[test]
    fn prop_unmarked_stderr_follows_exit_status(
        kind in provisioned_kind(),
        stderr in "[0-9 :]{0,40}",
    ) {
        prop_assert_eq!(
            classify(kind, true, &stderr).expect("classified"),
            AccountClassification::Correct
        );
        prop_assert!(classify(kind, false, &stderr).is_err());
    }

    /// Catch-up classification depends only on the phrase being present.
    #[test]
    fn prop_catchup_is_pure_function_of_stdout(
        before in "[a-zA-Z0-9 ()]{0,40}",
        after in "[a-zA-Z0-9 ()]{0,40}",
    ) {
        let with = format!("{before}{CAUGHT_UP_MARKER}{after}");
        prop_assert_eq!(classify_catchup(&with), SyncStatus::CaughtUp);
        prop_assert_eq!(classify_catchup(&with), classify_catchup(&with));
        if !format!("{before}{after}").contains(CAUGHT_UP_MARKER) {
            prop_assert_eq!(
                classify_catchup(&format!("{before}{after}")),
                SyncStatus::NotCaughtUp
            );
        }
    }

    /// Excerpts never exceed ten lines and are a prefix of the input.
    #[test]
    fn prop_excerpt_is_bounded_prefix(lines in proptest::collection::vec("[a-z0-9 ]{0,20}", 0..30)) {
        let stdout = lines.join("\n");
        let out = excerpt(&stdout);
        prop_assert!(out.lines().count() <= 10);
        prop_assert!(stdout.starts_with(&out));
    }

    /// Base58 keys of valid length are accepted; other alphabets are not.
    #[test]
    fn prop_parse_address_accepts_base58(key in "[1-9A-HJ-NP-Za-km-z]{32,44}") {
        prop_assert_eq!(parse_address(AccountKind::Stake, &key).expect("valid"), key);
    }

    #[test]
    fn prop_parse_address_rejects_zero_and_short(key in "0[1-9A-HJ-NP-Za-km-z]{31,43}|[1-9A-HJ-NP-Za-km-z]{1,31}") {
        prop_assert!(parse_address(AccountKind::Vote, &key).is_err());
    }

    /// Keys outside the whitelist are always rejected.
    #[test]
    fn prop_unknown_keys_rejected(key in "[a-z]{1,10}\\.[a-z_]{1,15}") {
        prop_assume!(!VALID_CONFIG_KEYS.contains(&key.as_str()));
        prop_assert!(validate_config_key(&key).is_err());
    }

    /// Any commission in range is accepted; anything above 100 is not.
    #[test]
    fn prop_commission_range(pct in 0u16..=300) {
        let mut config = ValctlConfig::default();
        let result = config.set("accounts.commission", &pct.to_string());
        prop_assert_eq!(result.is_ok(), pct <= 100);
    }
}

#[test]
fn every_whitelisted_key_is_settable_with_a_sane_value() {
    for key in VALID_CONFIG_KEYS {
        let mut config = ValctlConfig::default();
        let value = if key.ends_with("_port")
            || key.ends_with("_secs")
            || key.ends_with("_attempts")
            || key.ends_with("_version")
            || key.ends_with("_size")
            || key.ends_with("commission")
            || key.ends_with("stake_amount")
        {
            "5"
        } else {
            "/tmp/valctl"
        };
        config
            .set(key, value)
            .unwrap_or_else(|e| panic!("{key} rejected {value}: {e}"));
    }
}
