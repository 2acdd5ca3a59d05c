//! `kyc-server`: runs the KYC records service
//!
//! Configuration comes from the YAML file named by `KYC_CONFIG` plus `KYC_*`
//! environment overrides; logging is controlled by `RUST_LOG`.

use anyhow::{Context, Result};
use chrono::Duration;
use kyc::config::{IdentityBackend, KycConfig, StorageBackend};
use kyc::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kyc=info,kyc_server=info,tower_http=info")),
        )
        .init();

    let config = KycConfig::load().context("failed to load configuration")?;
    tracing::info!(
        bind = %config.server.bind,
        storage = ?config.storage.backend,
        identity = ?config.auth.provider,
        "starting kyc-records"
    );

    let builder = with_storage(ServerBuilder::from_config(&config), &config).await?;
    let builder = with_identity(builder, &config)?;
    builder.serve(&config.server.bind).await
}

async fn with_storage(builder: ServerBuilder, config: &KycConfig) -> Result<ServerBuilder> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(builder
            .with_customer_service(InMemoryDataService::<Customer>::new())
            .with_transaction_service(InMemoryDataService::<Transaction>::new())),
        #[cfg(feature = "mongodb_backend")]
        StorageBackend::Mongodb => {
            let client = mongodb::Client::with_uri_str(&config.storage.mongodb_uri)
                .await
                .with_context(|| format!("failed to connect to {}", config.storage.mongodb_uri))?;
            let database = client.database(&config.storage.database);

            let customers = MongoDataService::<Customer>::new(database.clone());
            let transactions = MongoDataService::<Transaction>::new(database);
            transactions.ensure_indexes(&["customer_id"]).await?;

            tracing::info!(database = %config.storage.database, "using MongoDB storage");
            Ok(builder
                .with_customer_service(customers)
                .with_transaction_service(transactions))
        }
        #[cfg(not(feature = "mongodb_backend"))]
        StorageBackend::Mongodb => {
            anyhow::bail!("storage.backend is mongodb but kyc-server was built without the mongodb_backend feature")
        }
    }
}

fn with_identity(builder: ServerBuilder, config: &KycConfig) -> Result<ServerBuilder> {
    match config.auth.provider {
        IdentityBackend::Memory => Ok(builder.with_identity_provider(
            InMemoryIdentityProvider::new(Duration::hours(config.auth.session_ttl_hours)),
        )),
        #[cfg(feature = "remote-auth")]
        IdentityBackend::Remote => {
            let api_key = config
                .auth
                .api_key
                .clone()
                .context("auth.api_key is required for the remote identity provider")?;
            Ok(builder.with_identity_provider(RemoteIdentityProvider::new(
                config.auth.remote_base_url.clone(),
                api_key,
            )))
        }
        #[cfg(not(feature = "remote-auth"))]
        IdentityBackend::Remote => {
            anyhow::bail!("auth.provider is remote but kyc-server was built without the remote-auth feature")
        }
    }
}
