//! Repository selection from environment and configuration files.

mod support;

use birthday_countdown::db::{
    KvConfig, MessageRepository, RepositoryError, RepositoryFactory, RepositoryType,
};
use std::time::Duration;
use support::{env_with, with_scoped_env};

#[test]
fn test_type_defaults_to_local() {
    with_scoped_env(&env_with(&[]), || {
        assert_eq!(RepositoryType::from_env().unwrap(), RepositoryType::Local);
    });
}

#[test]
fn test_type_follows_credentials() {
    with_scoped_env(&env_with(&[("CLOUDFLARE_ACCOUNT_ID", Some("acc"))]), || {
        assert_eq!(RepositoryType::from_env().unwrap(), RepositoryType::Kv);
    });
}

#[test]
fn test_explicit_type_wins() {
    let env = env_with(&[
        ("REPOSITORY_TYPE", Some("local")),
        ("CLOUDFLARE_ACCOUNT_ID", Some("acc")),
    ]);
    with_scoped_env(&env, || {
        assert_eq!(RepositoryType::from_env().unwrap(), RepositoryType::Local);
    });
}

#[test]
fn test_unknown_type_is_an_error() {
    with_scoped_env(&env_with(&[("REPOSITORY_TYPE", Some("redis"))]), || {
        assert!(RepositoryType::from_env().is_err());
        let err = RepositoryFactory::from_env().err().unwrap();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    });
}

#[test]
fn test_kv_config_from_env() {
    let env = env_with(&[
        ("CLOUDFLARE_ACCOUNT_ID", Some("acc")),
        ("CLOUDFLARE_API_TOKEN", Some(" tok ")),
        ("CLOUDFLARE_KV_NAMESPACE_ID", Some("ns")),
        ("CLOUDFLARE_API_BASE", Some("http://127.0.0.1:9999")),
        ("KV_TIMEOUT_SECS", Some("4")),
    ]);
    with_scoped_env(&env, || {
        let config = KvConfig::from_env().unwrap();
        assert_eq!(config.account_id, "acc");
        assert_eq!(config.api_token, "tok");
        assert_eq!(config.namespace_id, "ns");
        assert_eq!(config.api_base, "http://127.0.0.1:9999");
        assert_eq!(config.timeout, Duration::from_secs(4));
    });
}

#[test]
fn test_missing_credentials_fail_startup() {
    let env = env_with(&[
        ("REPOSITORY_TYPE", Some("kv")),
        ("CLOUDFLARE_ACCOUNT_ID", Some("acc")),
        ("CLOUDFLARE_KV_NAMESPACE_ID", Some("ns")),
    ]);
    with_scoped_env(&env, || {
        assert_eq!(
            KvConfig::from_env().unwrap_err(),
            "CLOUDFLARE_API_TOKEN is not configured."
        );
        let err = RepositoryFactory::from_env().err().unwrap();
        assert!(err.to_string().contains("CLOUDFLARE_API_TOKEN"));
    });
}

#[test]
fn test_bad_timeout_is_rejected() {
    let env = env_with(&[
        ("CLOUDFLARE_ACCOUNT_ID", Some("acc")),
        ("CLOUDFLARE_API_TOKEN", Some("tok")),
        ("CLOUDFLARE_KV_NAMESPACE_ID", Some("ns")),
        ("KV_TIMEOUT_SECS", Some("soon")),
    ]);
    with_scoped_env(&env, || {
        assert!(KvConfig::from_env().is_err());
    });
}

#[cfg(feature = "kv-repo")]
#[test]
fn test_from_env_builds_kv() {
    let env = env_with(&[
        ("CLOUDFLARE_ACCOUNT_ID", Some("acc")),
        ("CLOUDFLARE_API_TOKEN", Some("tok")),
        ("CLOUDFLARE_KV_NAMESPACE_ID", Some("ns")),
    ]);
    with_scoped_env(&env, || {
        assert!(RepositoryFactory::from_env().is_ok());
    });
}

#[tokio::test]
async fn test_from_config_file_local() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("repository.toml");
    std::fs::write(&path, "[repository]\ntype = \"local\"\n").unwrap();

    let repo = RepositoryFactory::from_config_file(&path).unwrap();
    assert!(repo.health_check().await.unwrap());
}

#[test]
fn test_from_config_file_kv_missing_token() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("repository.toml");
    std::fs::write(
        &path,
        "[repository]\ntype = \"kv\"\n\n[kv]\naccount_id = \"acc\"\nnamespace_id = \"ns\"\n",
    )
    .unwrap();

    with_scoped_env(&env_with(&[]), || {
        let err = RepositoryFactory::from_config_file(&path).err().unwrap();
        assert!(err.to_string().contains("kv.api_token"));
    });
}
