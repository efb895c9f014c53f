//! Integration tests for the factory and the provider's singleton
//! lifecycle

use config::FileFormat;
use quay::store::{
    build_document_store, resolve, DocumentStore, DocumentStoreProvider, HostEnvironment,
    StoreOptions,
};
use quay::QuayError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn environment(toml: &str) -> HostEnvironment {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, FileFormat::Toml))
        .build()
        .expect("test config should parse");
    HostEnvironment::new(Arc::new(config), "/srv/app")
}

fn orders_environment() -> HostEnvironment {
    environment(
        r#"
[settings]
urls = ["http://db:8080"]
database_name = "orders"
"#,
    )
}

#[tokio::test]
async fn build_returns_a_handle_carrying_the_settings() {
    let resolved = resolve(StoreOptions::new(), &orders_environment()).unwrap();

    let store = build_document_store(&resolved).await.unwrap();

    assert_eq!(store.database(), "orders");
    assert_eq!(store.urls(), ["http://db:8080".to_string()]);
    assert!(store.is_initialized());
}

#[tokio::test]
async fn build_fails_before_initialize_on_empty_urls() {
    let resolved = resolve(
        StoreOptions::new(),
        &environment(
            r#"
[settings]
urls = []
database_name = "orders"
"#,
        ),
    )
    .unwrap();

    let err = build_document_store(&resolved).await.unwrap_err();
    assert!(matches!(err, QuayError::Configuration(_)));
    assert!(err.to_string().contains("missing database urls"));
}

#[tokio::test]
async fn before_init_runs_once_before_initialize_on_the_returned_handle() {
    let calls = Arc::new(AtomicUsize::new(0));
    let saw_uninitialized = Arc::new(AtomicBool::new(false));

    let mut overrides = StoreOptions::new();
    {
        let calls = Arc::clone(&calls);
        let saw_uninitialized = Arc::clone(&saw_uninitialized);
        overrides.before_init(move |store| {
            calls.fetch_add(1, Ordering::SeqCst);
            saw_uninitialized.store(!store.is_initialized(), Ordering::SeqCst);
            store.conventions_mut().request_timeout = Duration::from_secs(5);
        });
    }

    let resolved = resolve(overrides, &orders_environment()).unwrap();
    let store = build_document_store(&resolved).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(saw_uninitialized.load(Ordering::SeqCst));
    // The hook mutated the same handle that came back
    assert_eq!(store.conventions().request_timeout, Duration::from_secs(5));
}

#[tokio::test]
async fn build_attaches_the_loaded_certificate() {
    let fixture_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let environment = {
        let config = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
[settings]
urls = ["https://db:8080"]
database_name = "orders"
cert_file_path = "tests/fixtures/client.pfx"
cert_password = "quay-test"
"#,
                FileFormat::Toml,
            ))
            .build()
            .expect("test config should parse");
        HostEnvironment::new(Arc::new(config), fixture_root)
    };

    let resolved = resolve(StoreOptions::new(), &environment).unwrap();
    assert!(resolved.certificate().is_some());

    let store = build_document_store(&resolved).await.unwrap();
    assert!(store.is_initialized());
    assert!(store.certificate().is_some());
}

#[tokio::test]
async fn provider_returns_the_same_instance_to_every_caller() {
    let provider = Arc::new(DocumentStoreProvider::new(orders_environment()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let provider = Arc::clone(&provider);
        handles.push(tokio::spawn(async move { provider.get().await }));
    }

    let mut stores: Vec<Arc<DocumentStore>> = Vec::new();
    for handle in handles {
        stores.push(handle.await.unwrap().unwrap());
    }

    let first = &stores[0];
    for store in &stores[1..] {
        assert!(Arc::ptr_eq(first, store));
    }
}

#[tokio::test]
async fn provider_retries_after_a_failed_build() {
    let attempts = Arc::new(AtomicUsize::new(0));

    let provider = {
        let attempts = Arc::clone(&attempts);
        DocumentStoreProvider::configure(orders_environment(), move |options| {
            options.client_builder(move |settings| {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err(QuayError::ClientInitialization(
                        "transient failure".to_string(),
                    ));
                }
                Ok(DocumentStore::new(
                    settings.urls.clone(),
                    settings.database_name.clone(),
                ))
            });
        })
    };

    let err = provider.get().await.unwrap_err();
    assert!(err.to_string().contains("transient failure"));
    assert!(provider.try_get().is_none());

    let store = provider.get().await.unwrap();
    assert_eq!(store.database(), "orders");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn configure_overrides_are_applied_at_registration() {
    let provider = DocumentStoreProvider::configure(orders_environment(), |options| {
        options.section_name("Settings").before_init(|store| {
            store.conventions_mut().tls_verify = false;
        });
    });

    let store = provider.get().await.unwrap();
    assert!(!store.conventions().tls_verify);
    assert_eq!(store.database(), "orders");
}
