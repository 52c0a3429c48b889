use crate::models::Planet;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the planet records plus the bulk loader's replace.
///
/// Absence is `Ok(None)`; `Err` always means the store itself failed.
#[async_trait]
pub trait PlanetStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Planet>, StoreError>;

    /// Remove every record, then insert `planets`. Returns the number inserted.
    async fn bulk_replace(&self, planets: Vec<Planet>) -> Result<usize, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Process-local store keyed by planet id.
#[derive(Debug, Default)]
pub struct InMemoryPlanetStore {
    planets: RwLock<BTreeMap<i64, Planet>>,
    failing: AtomicBool,
}

impl InMemoryPlanetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_planets(planets: impl IntoIterator<Item = Planet>) -> Self {
        let store = Self::new();
        if let Ok(mut guard) = store.planets.write() {
            guard.extend(planets.into_iter().map(|p| (p.id, p)));
        }
        store
    }

    /// While set, every operation fails with [`StoreError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.planets.read().map(|p| p.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store is in failing mode".to_string(),
            ));
        }
        Ok(())
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("in-memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl PlanetStore for InMemoryPlanetStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Planet>, StoreError> {
        self.check_available()?;
        let planets = self.planets.read().map_err(|_| Self::poisoned())?;
        Ok(planets.get(&id).cloned())
    }

    async fn bulk_replace(&self, planets: Vec<Planet>) -> Result<usize, StoreError> {
        self.check_available()?;
        let mut guard = self.planets.write().map_err(|_| Self::poisoned())?;
        guard.clear();
        guard.extend(planets.into_iter().map(|p| (p.id, p)));
        Ok(guard.len())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::solar_system;

    #[tokio::test]
    async fn finds_every_catalog_planet() {
        let store = InMemoryPlanetStore::with_planets(solar_system());

        for expected in solar_system() {
            let found = store.find_by_id(expected.id).await.unwrap();
            assert_eq!(found, Some(expected));
        }
    }

    #[tokio::test]
    async fn absent_id_is_none_not_error() {
        let store = InMemoryPlanetStore::with_planets(solar_system());

        assert!(store.find_by_id(9).await.unwrap().is_none());
        assert!(store.find_by_id(-1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn bulk_replace_discards_previous_records() {
        let store = InMemoryPlanetStore::with_planets(solar_system());
        let pluto = Planet::new(9, "Pluto", "Dwarf planet", "", "4.74 km/s", "5.9 billion km");

        let inserted = store.bulk_replace(vec![pluto.clone()]).await.unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_id(9).await.unwrap(), Some(pluto));
        assert!(store.find_by_id(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn bulk_replace_with_nothing_clears() {
        let store = InMemoryPlanetStore::with_planets(solar_system());

        assert_eq!(store.bulk_replace(Vec::new()).await.unwrap(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn failing_mode_is_distinct_from_absence() {
        let store = InMemoryPlanetStore::with_planets(solar_system());
        store.set_failing(true);

        assert!(matches!(
            store.find_by_id(3).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.health_check().await.is_err());

        store.set_failing(false);
        assert!(store.find_by_id(3).await.unwrap().is_some());
    }
}
