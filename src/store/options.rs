//! Store options and the resolution pipeline
//!
//! Callers hand the provider a [`StoreOptions`] with any subset of fields
//! set; resolution fills the rest from the host environment in a fixed
//! order and produces an immutable [`ResolvedOptions`]. Caller-provided
//! values always win: every stage only touches fields that are still
//! unset.
//!
//! The stage order is load-bearing: settings must be bound before the
//! certificate can be loaded (the certificate path lives inside the
//! settings), and both precede client construction.

use crate::config::{load_settings, Settings, DEFAULT_SECTION};
use crate::domain::errors::QuayError;
use crate::domain::result::Result;
use crate::store::client::DocumentStore;
use crate::tls::{self, CertificateHandle};
use config::Config;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Pre-initialization hook, run exactly once on the handle that will be
/// returned, strictly before `initialize()`
pub type BeforeInitFn = dyn Fn(&mut DocumentStore) + Send + Sync;

/// Constructs an uninitialized client handle from bound settings
///
/// Replaces only handle construction; validation, certificate attachment,
/// the pre-initialization hook, and `initialize()` stay with the factory.
pub type ClientBuilderFn = dyn Fn(&Settings) -> Result<DocumentStore> + Send + Sync;

/// The host environment the resolver draws defaults from
///
/// Carries the external key/value configuration source and the content
/// root path used to resolve relative certificate paths.
#[derive(Clone)]
pub struct HostEnvironment {
    config: Arc<Config>,
    root_path: PathBuf,
}

impl HostEnvironment {
    /// Create a host environment from a configuration source and root path
    pub fn new(config: Arc<Config>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root_path: root_path.into(),
        }
    }

    /// Create a host environment rooted at the current working directory
    ///
    /// # Errors
    ///
    /// Returns `QuayError::Configuration` if the current directory cannot
    /// be determined.
    pub fn from_current_dir(config: Arc<Config>) -> Result<Self> {
        let root_path = std::env::current_dir().map_err(|e| {
            QuayError::Configuration(format!("failed to determine content root: {e}"))
        })?;
        Ok(Self { config, root_path })
    }

    /// The external configuration source
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// The content root path
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

/// Mutable option overrides, captured at registration time
///
/// Every field left unset is filled during resolution. Setters are
/// chainable so a configure closure reads naturally:
///
/// ```rust,no_run
/// use quay::store::StoreOptions;
///
/// fn configure(options: &mut StoreOptions) {
///     options
///         .section_name("Database")
///         .before_init(|store| store.conventions_mut().tls_verify = false);
/// }
/// ```
#[derive(Clone, Default)]
pub struct StoreOptions {
    pub(crate) settings: Option<Settings>,
    pub(crate) section_name: Option<String>,
    pub(crate) config_source: Option<Arc<Config>>,
    pub(crate) host_root_path: Option<PathBuf>,
    pub(crate) certificate: Option<CertificateHandle>,
    pub(crate) before_init: Option<Arc<BeforeInitFn>>,
    pub(crate) client_builder: Option<Arc<ClientBuilderFn>>,
}

impl StoreOptions {
    /// Create empty options; resolution fills everything from defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-bound settings; suppresses the settings-binding stage
    pub fn settings(&mut self, settings: Settings) -> &mut Self {
        self.settings = Some(settings);
        self
    }

    /// Name of the configuration section to bind settings from
    pub fn section_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.section_name = Some(name.into());
        self
    }

    /// Configuration source override; defaults to the host environment's
    pub fn config_source(&mut self, source: Arc<Config>) -> &mut Self {
        self.config_source = Some(source);
        self
    }

    /// Content root override; defaults to the host environment's
    pub fn host_root_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.host_root_path = Some(path.into());
        self
    }

    /// Pre-loaded certificate; suppresses the certificate-loading stage
    pub fn certificate(&mut self, certificate: CertificateHandle) -> &mut Self {
        self.certificate = Some(certificate);
        self
    }

    /// Hook run on the handle after construction, before `initialize()`
    pub fn before_init(
        &mut self,
        hook: impl Fn(&mut DocumentStore) + Send + Sync + 'static,
    ) -> &mut Self {
        self.before_init = Some(Arc::new(hook));
        self
    }

    /// Custom handle construction, replacing the default builder
    pub fn client_builder(
        &mut self,
        builder: impl Fn(&Settings) -> Result<DocumentStore> + Send + Sync + 'static,
    ) -> &mut Self {
        self.client_builder = Some(Arc::new(builder));
        self
    }
}

/// Fully resolved, immutable options
///
/// Produced by [`resolve`]; safe to share read-only across any number of
/// construction attempts.
#[derive(Clone)]
pub struct ResolvedOptions {
    settings: Settings,
    section_name: String,
    config_source: Arc<Config>,
    host_root_path: PathBuf,
    certificate: Option<CertificateHandle>,
    before_init: Option<Arc<BeforeInitFn>>,
    client_builder: Arc<ClientBuilderFn>,
}

impl ResolvedOptions {
    /// The bound connection settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The section name settings were (or would have been) bound from
    pub fn section_name(&self) -> &str {
        &self.section_name
    }

    /// The configuration source used during resolution
    pub fn config_source(&self) -> Arc<Config> {
        Arc::clone(&self.config_source)
    }

    /// The content root certificate paths were resolved against
    pub fn host_root_path(&self) -> &Path {
        &self.host_root_path
    }

    /// The loaded client certificate, if any
    pub fn certificate(&self) -> Option<&CertificateHandle> {
        self.certificate.as_ref()
    }

    /// The pre-initialization hook, if any
    pub fn before_init(&self) -> Option<&Arc<BeforeInitFn>> {
        self.before_init.as_ref()
    }

    /// The handle builder (default or caller-supplied)
    pub fn client_builder(&self) -> &Arc<ClientBuilderFn> {
        &self.client_builder
    }
}

impl std::fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("settings", &self.settings)
            .field("section_name", &self.section_name)
            .field("config_source", &self.config_source)
            .field("host_root_path", &self.host_root_path)
            .field("certificate", &self.certificate)
            .field("before_init", &self.before_init.as_ref().map(|_| "<fn>"))
            .field("client_builder", &"<fn>")
            .finish()
    }
}

/// The default handle builder: urls + database name, nothing else
fn default_client_builder(settings: &Settings) -> Result<DocumentStore> {
    Ok(DocumentStore::new(
        settings.urls.clone(),
        settings.database_name.clone(),
    ))
}

/// Pre-phase: bind environment handles left unset by the caller
fn bind_environment(mut options: StoreOptions, env: &HostEnvironment) -> StoreOptions {
    if options.config_source.is_none() {
        options.config_source = Some(env.config());
    }
    if options.host_root_path.is_none() {
        options.host_root_path = Some(env.root_path().to_path_buf());
    }
    options
}

/// Pre-phase: bind settings from the configuration source if unset
fn bind_settings(mut options: StoreOptions) -> Result<StoreOptions> {
    if options.settings.is_none() {
        let section = options.section_name.as_deref().unwrap_or(DEFAULT_SECTION);
        let source = options
            .config_source
            .as_ref()
            .expect("environment binding precedes settings binding");
        options.settings = Some(load_settings(source, section)?);
    }
    Ok(options)
}

/// Post-phase: load the client certificate if unset and a path is bound
fn load_certificate(mut options: StoreOptions) -> Result<StoreOptions> {
    if options.certificate.is_none() {
        let settings = options
            .settings
            .as_ref()
            .expect("settings binding precedes certificate loading");
        let root_path = options
            .host_root_path
            .as_ref()
            .expect("environment binding precedes certificate loading");
        options.certificate = tls::load_certificate(
            settings.certificate_path(),
            root_path,
            settings.cert_password.as_ref(),
        )?;
    }
    Ok(options)
}

/// Post-phase: bind the default client builder if unset
fn bind_builder(mut options: StoreOptions) -> StoreOptions {
    if options.client_builder.is_none() {
        options.client_builder = Some(Arc::new(default_client_builder));
    }
    options
}

/// Resolves option overrides against the host environment
///
/// Runs the fill-if-absent pipeline in its fixed order (environment,
/// settings, certificate, builder) and freezes the result. Resolution
/// never constructs the client; it only finalizes options.
///
/// # Errors
///
/// Propagates settings-binding and certificate-loading failures; never
/// fails for any other reason.
pub fn resolve(overrides: StoreOptions, env: &HostEnvironment) -> Result<ResolvedOptions> {
    let options = bind_environment(overrides, env);
    let options = bind_settings(options)?;
    let options = load_certificate(options)?;
    let options = bind_builder(options);

    tracing::debug!(
        section = options.section_name.as_deref().unwrap_or(DEFAULT_SECTION),
        certificate = options.certificate.is_some(),
        "Store options resolved"
    );

    Ok(ResolvedOptions {
        settings: options
            .settings
            .expect("settings bound by resolution pipeline"),
        section_name: options
            .section_name
            .unwrap_or_else(|| DEFAULT_SECTION.to_string()),
        config_source: options
            .config_source
            .expect("config source bound by resolution pipeline"),
        host_root_path: options
            .host_root_path
            .expect("root path bound by resolution pipeline"),
        certificate: options.certificate,
        before_init: options.before_init,
        client_builder: options
            .client_builder
            .expect("builder bound by resolution pipeline"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn env_with(toml: &str) -> HostEnvironment {
        let config = Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .expect("test config should parse");
        HostEnvironment::new(Arc::new(config), "/srv/app")
    }

    fn orders_env() -> HostEnvironment {
        env_with(
            r#"
[settings]
urls = ["http://db:8080"]
database_name = "orders"
"#,
        )
    }

    #[test]
    fn test_resolve_fills_all_defaults() {
        let resolved = resolve(StoreOptions::new(), &orders_env()).unwrap();

        assert_eq!(resolved.settings().database_name, "orders");
        assert_eq!(resolved.settings().urls, ["http://db:8080".to_string()]);
        assert_eq!(resolved.section_name(), DEFAULT_SECTION);
        assert_eq!(resolved.host_root_path(), Path::new("/srv/app"));
        assert!(resolved.certificate().is_none());
        assert!(resolved.before_init().is_none());
    }

    #[test]
    fn test_resolve_caller_settings_win() {
        let mut overrides = StoreOptions::new();
        overrides.settings(Settings {
            urls: vec!["http://other:9090".to_string()],
            database_name: "inventory".to_string(),
            ..Settings::default()
        });

        let resolved = resolve(overrides, &orders_env()).unwrap();

        assert_eq!(resolved.settings().database_name, "inventory");
        assert_eq!(resolved.settings().urls, ["http://other:9090".to_string()]);
    }

    #[test]
    fn test_resolve_caller_section_name_wins() {
        let env = env_with(
            r#"
[settings]
database_name = "orders"

[replica]
urls = ["http://replica:8080"]
database_name = "orders-replica"
"#,
        );

        let mut overrides = StoreOptions::new();
        overrides.section_name("replica");
        let resolved = resolve(overrides, &env).unwrap();

        assert_eq!(resolved.section_name(), "replica");
        assert_eq!(resolved.settings().database_name, "orders-replica");
    }

    #[test]
    fn test_resolve_caller_root_path_wins() {
        let mut overrides = StoreOptions::new();
        overrides.host_root_path("/etc/quay");

        let resolved = resolve(overrides, &orders_env()).unwrap();
        assert_eq!(resolved.host_root_path(), Path::new("/etc/quay"));
    }

    #[test]
    fn test_resolve_caller_before_init_survives() {
        let mut overrides = StoreOptions::new();
        overrides.before_init(|store| store.conventions_mut().tls_verify = false);

        let resolved = resolve(overrides, &orders_env()).unwrap();
        assert!(resolved.before_init().is_some());
    }

    #[test]
    fn test_resolve_binds_default_builder() {
        let resolved = resolve(StoreOptions::new(), &orders_env()).unwrap();

        let store = (resolved.client_builder())(resolved.settings()).unwrap();
        assert_eq!(store.database(), "orders");
        assert!(!store.is_initialized());
    }

    #[test]
    fn test_resolve_missing_section_yields_empty_settings() {
        let env = env_with("[unrelated]\nkey = 1\n");

        let resolved = resolve(StoreOptions::new(), &env).unwrap();
        assert!(resolved.settings().urls.is_empty());
        assert!(resolved.settings().database_name.is_empty());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let env = orders_env();

        let first = resolve(StoreOptions::new(), &env).unwrap();
        let second = resolve(StoreOptions::new(), &env).unwrap();

        assert_eq!(first.settings().urls, second.settings().urls);
        assert_eq!(
            first.settings().database_name,
            second.settings().database_name
        );
        assert_eq!(first.section_name(), second.section_name());
        assert_eq!(first.host_root_path(), second.host_root_path());
        assert_eq!(
            first.certificate().map(|c| c.path().to_path_buf()),
            second.certificate().map(|c| c.path().to_path_buf())
        );
    }

    #[test]
    fn test_resolve_missing_certificate_file_fails() {
        let env = env_with(
            r#"
[settings]
urls = ["http://db:8080"]
database_name = "orders"
cert_file_path = "certs/absent.pfx"
"#,
        );

        let err = resolve(StoreOptions::new(), &env).unwrap_err();
        assert!(matches!(err, QuayError::Configuration(_)));
        assert!(err.to_string().contains("certificate file missing"));
    }

    #[test]
    fn test_stage_order_settings_before_certificate() {
        // The certificate stage reads the path out of the bound settings;
        // a settings override carrying a bogus path must be what the
        // certificate stage sees, not the config source's section.
        let mut overrides = StoreOptions::new();
        overrides.settings(Settings {
            urls: vec!["http://db:8080".to_string()],
            database_name: "orders".to_string(),
            cert_file_path: Some("override/absent.pfx".to_string()),
            cert_password: None,
        });

        let err = resolve(overrides, &orders_env()).unwrap_err();
        assert!(err.to_string().contains("override/absent.pfx"));
    }
}
