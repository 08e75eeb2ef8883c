//! In-process store of ingested battery tests.
//!
//! The repository owns the authoritative in-memory collection and writes
//! through to an injected [`TestStore`] on every mutation. Persistence is
//! best-effort: a failing backend is logged and the in-memory collection
//! stays authoritative, so interactive use survives a broken disk or a
//! corrupt payload.

use crate::state::BatteryTest;

/// Durable backing store for the whole test collection.
pub trait TestStore {
    /// Load the persisted collection. Implementations degrade to an empty
    /// collection when the stored payload cannot be decoded.
    fn load(&self) -> anyhow::Result<Vec<BatteryTest>>;

    /// Persist the full collection, replacing the previous snapshot.
    fn save(&self, tests: &[BatteryTest]) -> anyhow::Result<()>;
}

/// Owner of all [`BatteryTest`] entities. Constructed once per process and
/// passed by reference to consumers.
#[derive(Default)]
pub struct TestRepository {
    tests: Vec<BatteryTest>,
    store: Option<Box<dyn TestStore>>,
}

impl TestRepository {
    /// Memory-only repository, mostly for tests and previews.
    pub fn new() -> Self {
        Self {
            tests: Vec::new(),
            store: None,
        }
    }

    /// Repository backed by a durable store, seeded with whatever the
    /// store holds.
    pub fn with_store(store: Box<dyn TestStore>) -> Self {
        let tests = match store.load() {
            Ok(tests) => tests,
            Err(e) => {
                tracing::warn!("failed to load persisted tests: {e:#}");
                Vec::new()
            }
        };
        tracing::info!("loaded {} persisted test(s)", tests.len());
        Self {
            tests,
            store: Some(store),
        }
    }

    pub fn add(&mut self, test: BatteryTest) {
        self.tests.push(test);
        self.persist();
    }

    pub fn get_all(&self) -> &[BatteryTest] {
        &self.tests
    }

    pub fn get_by_id(&self, id: &str) -> Option<&BatteryTest> {
        self.tests.iter().find(|test| test.id == id)
    }

    /// Remove a test and its records. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tests.len();
        self.tests.retain(|test| test.id != id);
        let removed = self.tests.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Tests matching the given pack/module numbers; `None` matches all.
    pub fn filter(&self, pack: Option<u32>, module: Option<u32>) -> Vec<&BatteryTest> {
        self.tests
            .iter()
            .filter(|test| test.matches(pack, module))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.tests) {
                tracing::warn!("failed to persist test collection: {e:#}");
            }
        }
    }
}
