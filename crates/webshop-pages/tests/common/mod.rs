// Shared fixtures for the storefront flow tests
//
// Flows run against an in-process storefront twin by default. Set
// WEBSHOP_LIVE=1 to point them at the configured site instead; PASSWORD and
// the other Config::from_env variables then apply.

#![allow(dead_code)]

use tracing_subscriber::EnvFilter;
use webshop_pages::{Config, Credentials, PageObject, Session, SharedAccount, register_account};
use webshop_twin::TwinServer;

/// Selects the live site instead of the twin
pub const LIVE_VAR: &str = "WEBSHOP_LIVE";

/// Password for accounts registered on the twin
pub const TWIN_PASSWORD: &str = "Secret123!";

/// One registered account per test binary on the live site
static LIVE_ACCOUNT: SharedAccount = SharedAccount::new();

/// Installs a fmt subscriber once per binary; `RUST_LOG` overrides `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn is_live() -> bool {
    matches!(
        std::env::var(LIVE_VAR).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Storefront a test talks to: its own twin server, or the live site.
pub struct Target {
    config: Config,
    twin: Option<TwinServer>,
}

impl Target {
    pub async fn start() -> Self {
        if is_live() {
            let config = Config::from_env().expect("Failed to read live configuration");
            return Self { config, twin: None };
        }

        let twin = TwinServer::start()
            .await
            .expect("Failed to start storefront twin");
        let config =
            Config::new(&twin.url(), TWIN_PASSWORD).expect("Failed to build twin configuration");
        Self {
            config,
            twin: Some(twin),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_twin(&self) -> bool {
        self.twin.is_some()
    }

    /// Fresh browser context: own cookies, own guest cart.
    pub async fn session(&self) -> Session {
        Session::start(&self.config)
            .await
            .expect("Failed to start browser session")
    }

    /// A registered account that no other test is logged in as right now.
    ///
    /// The twin forgets accounts when it stops, so each twin-backed test
    /// registers its own. On the live site every test shares one.
    pub async fn account(&self) -> Credentials {
        if self.twin.is_none() {
            return LIVE_ACCOUNT
                .get_or_register(&self.config)
                .await
                .expect("Failed to obtain shared account")
                .clone();
        }
        self.fresh_account().await
    }

    /// Registers a brand new account in a throwaway session.
    pub async fn fresh_account(&self) -> Credentials {
        let session = self.session().await;
        let credentials = register_account(&session)
            .await
            .expect("Failed to register account");
        session.close().await.expect("Failed to close session");
        credentials
    }

    pub fn shutdown(self) {
        if let Some(twin) = self.twin {
            twin.shutdown();
        }
    }
}

/// Opens a page object and points it at `path` in one step.
pub async fn open_at<P: PageObject>(session: &Session, path: &str) -> P {
    let page: P = session.open();
    page.base()
        .navigate(path)
        .await
        .expect("Failed to navigate");
    page
}

/// Closes the browser, then stops the twin.
pub async fn finish(session: Session, target: Target) {
    session.close().await.expect("Failed to close session");
    target.shutdown();
}
