//! The single-shot run
//!
//! 1. fill the credential slot (soft failures only reported)
//! 2. check the credential exists before touching any I/O resource
//! 3. open the ephemeral database and the HTTP client together
//! 4. populate the fixture, send one completion request
//! 5. release both resources, whatever happened in step 4

use crate::app::AppConfig;
use crate::completion::{build_client, CompletionOrchestrator};
use crate::credentials::{CredentialLoader, CredentialStore, LoadOutcome};
use crate::database;
use crate::env::FileEnv;
use crate::error::Result;
use crate::fixture::{Employee, FixtureSession};
use rand::Rng;
use reqwest::Client;
use sqlx::SqliteConnection;
use std::future::Future;
use tracing::{debug, info};

/// Seed the credential slot from the environment, then from the key file
pub fn prepare_credentials<F: FileEnv>(
    config: &AppConfig,
    loader: &CredentialLoader<F>,
) -> (CredentialStore, LoadOutcome) {
    let mut store = CredentialStore::from_process_env(&config.credential_var);
    let outcome = loader.load(&mut store, &config.credential_var, &config.credential_file);
    (store, outcome)
}

/// Everything the run acquires and must give back
pub struct WorkflowResources {
    pub db: SqliteConnection,
    pub http: Client,
}

impl WorkflowResources {
    /// Open the database and build the client concurrently.
    ///
    /// If one side fails, whatever the other side acquired is dropped.
    pub async fn acquire(config: &AppConfig) -> Result<Self> {
        Self::acquire_with(database::open_ephemeral(), async {
            build_client(config.request_timeout)
        })
        .await
    }

    async fn acquire_with<D, H>(db: D, http: H) -> Result<Self>
    where
        D: Future<Output = Result<SqliteConnection>>,
        H: Future<Output = Result<Client>>,
    {
        let (db, http) = tokio::try_join!(db, http)?;
        debug!("Acquired database connection and HTTP client");
        Ok(Self { db, http })
    }

    pub async fn release(self) {
        database::close(self.db).await;
        drop(self.http);
        debug!("Released database connection and HTTP client");
    }
}

/// What a successful run produced
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowReport {
    pub answer: String,
    /// The `employees` table as read back inside the fixture scope
    pub stored: Vec<Employee>,
}

/// Run the workflow once with an already prepared credential store
pub async fn run<R: Rng + ?Sized>(
    config: &AppConfig,
    credentials: &CredentialStore,
    rng: &mut R,
) -> Result<WorkflowReport> {
    let credential = credentials.require(&config.credential_var)?;

    let mut resources = WorkflowResources::acquire(config).await?;
    let outcome = run_with(&mut resources, config, credential, rng).await;
    resources.release().await;

    outcome
}

async fn run_with<R: Rng + ?Sized>(
    resources: &mut WorkflowResources,
    config: &AppConfig,
    credential: &str,
    rng: &mut R,
) -> Result<WorkflowReport> {
    let mut fixture = FixtureSession::enter(&mut resources.db, &config.roster, rng).await?;
    debug!("db = {:?}", fixture.connection());
    debug!("client = {:?}", resources.http);

    let stored = fixture.fetch_stored().await?;
    for employee in &stored {
        debug!(name = employee.name(), salary = employee.salary(), "employee row");
    }

    let orchestrator = CompletionOrchestrator::new(&resources.http, config.root_url.as_str());
    let answer = orchestrator
        .complete(credential, &config.completion_request())
        .await?;
    info!("Completion answered ({} chars)", answer.len());

    Ok(WorkflowReport { answer, stored })
}
