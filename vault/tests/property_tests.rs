//! Property-based tests for the Vault reader.
//!
//! Tests validate:
//! - Mount prefix normalization is idempotent and ends in a single `/`
//! - JSON output decodes back to the plain payload
//! - Byte maps keep every key and the text form of every value
//! - Tokens never appear in debug output

use async_trait::async_trait;
use proptest::prelude::*;
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use vault_reader::{
    LogicalBackend, LogicalSecret, SecretClient, SecretData, VaultConfig, VaultResult,
    config::{ENV_STORAGE, ENV_TOKEN, normalize_storage},
    convert::{display_value, to_byte_map, to_json},
};

/// Backend that answers every read with the same payload.
struct StaticBackend(SecretData);

#[async_trait]
impl LogicalBackend for StaticBackend {
    async fn read(&self, _path: &str) -> VaultResult<Option<LogicalSecret>> {
        Ok(Some(LogicalSecret {
            data: Some(self.0.clone()),
            ..Default::default()
        }))
    }

    async fn list(&self, _path: &str) -> VaultResult<Option<LogicalSecret>> {
        Ok(None)
    }
}

// Strategy for mount prefixes, with and without trailing slash
fn storage_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9_-]{0,10}", 1..4)
        .prop_flat_map(|segments| {
            let joined = segments.join("/");
            prop_oneof![Just(joined.clone()), Just(format!("{joined}/"))]
        })
}

// Strategy for payload values, nested up to two levels
fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[A-Za-z0-9 _.-]{0,24}".prop_map(Value::String),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

// Strategy for secret payloads
fn payload_strategy() -> impl Strategy<Value = SecretData> {
    prop::collection::btree_map("[a-z_][a-z0-9_]{0,15}", value_strategy(), 0..8)
        .prop_map(|m| m.into_iter().collect::<Map<String, Value>>())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Normalizing twice gives the same prefix, which ends in exactly one `/`.
    #[test]
    fn prop_storage_normalization_idempotent(storage in storage_strategy()) {
        let once = normalize_storage(&storage);
        let twice = normalize_storage(&once);

        prop_assert_eq!(&once, &twice);
        prop_assert!(once.ends_with('/'));
        prop_assert!(!once.ends_with("//"));
        prop_assert_eq!(once.trim_end_matches('/'), storage.trim_end_matches('/'));
    }

    /// The storage path is the prefix followed by the untouched key.
    #[test]
    fn prop_storage_path_is_prefix_plus_key(
        storage in storage_strategy(),
        key in "[A-Za-z0-9/_. -]{1,32}",
    ) {
        let config = VaultConfig::from_lookup(|name| {
            (name == ENV_STORAGE).then(|| storage.clone())
        })
        .into_inner();

        let path = config.storage_path(&key);
        prop_assert!(path.starts_with(&config.storage));
        prop_assert_eq!(&path[config.storage.len()..], key.as_str());
    }

    /// JSON output decodes back to the payload.
    #[test]
    fn prop_json_round_trip(payload in payload_strategy()) {
        let bytes = to_json(&payload).unwrap();
        let decoded: SecretData = serde_json::from_slice(&bytes).unwrap();
        prop_assert_eq!(decoded, payload);
    }

    /// One byte entry per payload entry, same keys, default text form as value.
    #[test]
    fn prop_byte_map_preserves_keys(payload in payload_strategy()) {
        let bytes = to_byte_map(&payload);

        prop_assert_eq!(bytes.len(), payload.len());
        for (key, value) in &payload {
            let expected = display_value(value);
            let rendered = bytes.get(key).map(Vec::as_slice);
            prop_assert_eq!(rendered, Some(expected.as_bytes()));
        }
    }

    /// get_json and get_plain_data agree for the same key.
    #[test]
    fn prop_client_json_matches_plain(payload in payload_strategy()) {
        let client = SecretClient::with_backend(
            VaultConfig::default(),
            StaticBackend(payload.clone()),
        );

        let (plain, json) = tokio_test::block_on(async {
            (
                client.get_plain_data("app").await.unwrap(),
                client.get_json("app").await.unwrap(),
            )
        });
        let decoded: SecretData = serde_json::from_slice(&json).unwrap();

        prop_assert_eq!(&plain, &payload);
        prop_assert_eq!(decoded, plain);
    }

    /// Tokens read from the environment never show up in debug output.
    #[test]
    fn prop_token_not_exposed_in_debug(token in "s\\.[A-Za-z0-9]{24}") {
        let config = VaultConfig::from_lookup(|name| {
            (name == ENV_TOKEN).then(|| token.clone())
        })
        .into_inner();

        let debug_output = format!("{config:?}");
        prop_assert!(!debug_output.contains(&token));
        prop_assert!(debug_output.contains("REDACTED"));
        prop_assert_eq!(config.token.expose_secret(), token.as_str());
    }
}

/// Unset environment resolves to the documented defaults.
#[test]
fn test_unset_environment_defaults() {
    let resolved = VaultConfig::from_lookup(|_| None);
    assert!(resolved.is_clean());

    let config = resolved.into_inner();
    assert_eq!(config.addr, "https://127.0.0.1:8200");
    assert!(!config.insecure);
    assert_eq!(config.storage, "secret/");
    assert_eq!(config.storage_path("x"), "secret/x");
}

/// A client can be built from the defaults without a reachable server.
#[test]
fn test_client_builds_from_defaults() {
    let config = VaultConfig::from_lookup(|name| (name == ENV_TOKEN).then(|| "abc".to_string()))
        .into_inner();
    let client = SecretClient::new(config).unwrap();
    assert_eq!(client.config().storage, "secret/");
    assert_eq!(client.config().token.expose_secret(), "abc");
}
