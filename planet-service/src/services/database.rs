use super::store::{PlanetStore, StoreError};
use crate::models::Planet;
use async_trait::async_trait;
use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};

const PLANETS_COLLECTION: &str = "planets";

/// MongoDB-backed planet store. Cloning shares the driver's connection pool.
#[derive(Clone)]
pub struct PlanetDb {
    client: MongoClient,
    db: Database,
}

impl PlanetDb {
    /// Connect using `uri`. The database named in the URI path wins over
    /// `fallback_database`.
    pub async fn connect(uri: &str, fallback_database: &str) -> Result<Self, StoreError> {
        let client = Self::client(uri).await?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(fallback_database));
        tracing::info!(database = %db.name(), "MongoDB client ready");
        Ok(Self { client, db })
    }

    /// Connect using `uri` but always use `database`, ignoring any database
    /// named in the URI path.
    pub async fn with_database(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Self::client(uri).await?;
        let db = client.database(database);
        tracing::info!(database = %db.name(), "MongoDB client ready");
        Ok(Self { client, db })
    }

    async fn client(uri: &str) -> Result<MongoClient, StoreError> {
        tracing::info!("Connecting to MongoDB");
        MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            StoreError::Database(e)
        })
    }

    pub fn database_name(&self) -> &str {
        self.db.name()
    }

    pub async fn initialize_indexes(&self) -> Result<(), StoreError> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .name("id_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.planets()
            .create_index(id_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create id index: {}", e);
                StoreError::Database(e)
            })?;

        tracing::info!("MongoDB indexes ready");
        Ok(())
    }

    pub fn planets(&self) -> Collection<Planet> {
        self.db.collection(PLANETS_COLLECTION)
    }
}

#[async_trait]
impl PlanetStore for PlanetDb {
    async fn find_by_id(&self, id: i64) -> Result<Option<Planet>, StoreError> {
        self.planets()
            .find_one(doc! { "id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(planet_id = id, "Failed to query planet: {}", e);
                StoreError::Database(e)
            })
    }

    async fn bulk_replace(&self, planets: Vec<Planet>) -> Result<usize, StoreError> {
        let collection = self.planets();

        let deleted = collection.delete_many(doc! {}, None).await?;
        tracing::info!(deleted = deleted.deleted_count, "Cleared planets collection");

        if planets.is_empty() {
            return Ok(0);
        }

        let inserted = collection.insert_many(planets, None).await?;
        tracing::info!(inserted = inserted.inserted_ids.len(), "Inserted planets");
        Ok(inserted.inserted_ids.len())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::Database(e)
            })?;
        Ok(())
    }
}
