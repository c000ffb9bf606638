use std::net::SocketAddr;

use crewdeck_api::{build_router, state::AppState};
use crewdeck_config::Settings;
use crewdeck_db::indexes::ensure_indexes;
use crewdeck_services::IdentityService;
use mongodb::{Client, Database, options::ClientOptions};
use tokio::net::TcpListener;

/// A running test application with its own MongoDB database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub base_url: String,
    pub db: Database,
    pub settings: Settings,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn a new test server connected to the test MongoDB.
    ///
    /// Requires a running MongoDB at localhost:27017.
    /// Set CREWDECK__DATABASE__URL env var to override the connection string.
    /// Each test gets a unique database name for isolation.
    pub async fn spawn() -> Self {
        Self::spawn_with_settings(|_| {}).await
    }

    /// Spawn a test server with customized settings.
    ///
    /// The `mutator` closure receives a `&mut Settings` after defaults
    /// are applied, allowing tests to tweak specific fields (e.g. the
    /// rate limiter).
    pub async fn spawn_with_settings(mutator: impl FnOnce(&mut Settings)) -> Self {
        let db_name = format!("crewdeck_test_{}", uuid::Uuid::new_v4().simple());

        let mut settings = Settings::load().unwrap_or_else(|_| test_settings());
        if let Ok(url) = std::env::var("CREWDECK__DATABASE__URL") {
            settings.database.url = url;
        }
        settings.database.name = db_name.clone();
        // Generous by default so ordinary fixtures never trip the
        // provisioning throttle; throttle tests dial it down.
        settings.rate_limit.per_second = 100;
        settings.rate_limit.burst = 100;

        mutator(&mut settings);

        let client_options = ClientOptions::parse(&settings.database.url)
            .await
            .expect("Failed to parse MongoDB URL");
        let mongo_client =
            Client::with_options(client_options).expect("Failed to create MongoDB client");
        let db = mongo_client.database(&db_name);

        ensure_indexes(&db).await.expect("Failed to create indexes");

        let app_state = AppState::new(db.clone(), settings.clone());
        let app = build_router(app_state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        let base_url = format!("http://{}", addr);
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");

        Self {
            addr,
            base_url,
            db,
            settings,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Mint a bearer credential the way the identity provider would.
    pub fn issue_token(
        &self,
        subject_id: &str,
        email: Option<&str>,
        display_name: Option<&str>,
        picture_url: Option<&str>,
    ) -> String {
        IdentityService::new(self.settings.auth.clone())
            .issue(subject_id, email, display_name, picture_url)
            .expect("Failed to issue credential")
    }

    pub fn auth_get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_patch(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_delete(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let db = self.db.clone();
        // Best effort cleanup: drop the test database
        tokio::spawn(async move {
            let _ = db.drop().await;
        });
    }
}

fn test_settings() -> Settings {
    Settings {
        app: crewdeck_config::AppSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec![],
        },
        database: crewdeck_config::DatabaseSettings {
            url: "mongodb://localhost:27017".to_string(),
            name: "crewdeck_test".to_string(),
            max_pool_size: Some(5),
            min_pool_size: Some(1),
        },
        auth: crewdeck_config::AuthSettings {
            secret: "test-secret-key-for-credential-signing-32ch".to_string(),
            issuer: "crewdeck".to_string(),
            credential_ttl_secs: 3600,
        },
        rate_limit: crewdeck_config::RateLimitSettings {
            per_second: 100,
            burst: 100,
        },
    }
}
