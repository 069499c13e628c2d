//! Storage and identity collaborators.
//!
//! The engine never persists anything itself. [`RecordStore`] is the seam to
//! whatever holds an owner's locations, areas, rules and bookings, and
//! [`OwnerDirectory`] maps a public handle to an owner id.
//!
//! [`InMemoryStore`] implements both for tests, the CLI and embedding.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::Result;
use crate::model::{Area, AvailabilityRule, BookedSlot, Location, OwnerRecords};

/// Create/read/update/delete access to one owner's records.
///
/// A successful write must be visible to the next read.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so the service can be shared across
/// tasks.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn locations(&self, owner: &str) -> Result<Vec<Location>>;
    async fn areas(&self, owner: &str) -> Result<Vec<Area>>;
    async fn rules(&self, owner: &str) -> Result<Vec<AvailabilityRule>>;
    async fn bookings(&self, owner: &str) -> Result<Vec<BookedSlot>>;

    /// Insert or replace by `id`.
    async fn put_location(&self, owner: &str, location: Location) -> Result<()>;
    async fn delete_location(&self, owner: &str, location_id: &str) -> Result<()>;

    /// Insert or replace by `name`.
    async fn put_area(&self, owner: &str, area: Area) -> Result<()>;
    async fn delete_area(&self, owner: &str, area_name: &str) -> Result<()>;

    async fn put_rule(&self, owner: &str, rule: AvailabilityRule) -> Result<()>;
    async fn delete_rule(&self, owner: &str, rule_id: &str) -> Result<()>;

    async fn put_booking(&self, owner: &str, booking: BookedSlot) -> Result<()>;
    async fn delete_booking(&self, owner: &str, booking_id: &str) -> Result<()>;
}

/// Resolves the public handle in a booking link to an owner id.
#[async_trait]
pub trait OwnerDirectory: Send + Sync {
    /// `Ok(None)` when no account matches the handle.
    async fn resolve(&self, handle: &str) -> Result<Option<String>>;
}

/// Fetch all four collections for `owner` concurrently.
///
/// # Errors
/// The first failing fetch is returned; partial results are discarded.
pub async fn fetch_owner_records<S>(store: &S, owner: &str) -> Result<OwnerRecords>
where
    S: RecordStore + ?Sized,
{
    let (locations, areas, rules, bookings) = tokio::try_join!(
        store.locations(owner),
        store.areas(owner),
        store.rules(owner),
        store.bookings(owner),
    )?;
    Ok(OwnerRecords {
        locations,
        areas,
        rules,
        bookings,
    })
}

/// Process-local store keyed by owner id.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    owners: RwLock<HashMap<String, OwnerRecords>>,
    handles: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything stored for `owner`.
    pub fn load(&self, owner: impl Into<String>, records: OwnerRecords) {
        self.owners.write().insert(owner.into(), records);
    }

    /// Register a public handle for `owner`.
    pub fn register_handle(&self, handle: impl Into<String>, owner: impl Into<String>) {
        self.handles.write().insert(handle.into(), owner.into());
    }

    fn read<T>(&self, owner: &str, f: impl FnOnce(&OwnerRecords) -> T) -> T
    where
        T: Default,
    {
        self.owners.read().get(owner).map(f).unwrap_or_default()
    }

    fn write(&self, owner: &str, f: impl FnOnce(&mut OwnerRecords)) {
        let mut owners = self.owners.write();
        f(owners.entry(owner.to_string()).or_default());
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T) -> bool) {
    match items.iter_mut().find(|existing| same(existing)) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn locations(&self, owner: &str) -> Result<Vec<Location>> {
        Ok(self.read(owner, |r| r.locations.clone()))
    }

    async fn areas(&self, owner: &str) -> Result<Vec<Area>> {
        Ok(self.read(owner, |r| r.areas.clone()))
    }

    async fn rules(&self, owner: &str) -> Result<Vec<AvailabilityRule>> {
        Ok(self.read(owner, |r| r.rules.clone()))
    }

    async fn bookings(&self, owner: &str) -> Result<Vec<BookedSlot>> {
        Ok(self.read(owner, |r| r.bookings.clone()))
    }

    async fn put_location(&self, owner: &str, location: Location) -> Result<()> {
        self.write(owner, |r| {
            let id = location.id.clone();
            upsert(&mut r.locations, location, |l| l.id == id);
        });
        Ok(())
    }

    async fn delete_location(&self, owner: &str, location_id: &str) -> Result<()> {
        self.write(owner, |r| r.locations.retain(|l| l.id != location_id));
        Ok(())
    }

    async fn put_area(&self, owner: &str, area: Area) -> Result<()> {
        self.write(owner, |r| {
            let name = area.name.clone();
            upsert(&mut r.areas, area, |a| a.name == name);
        });
        Ok(())
    }

    async fn delete_area(&self, owner: &str, area_name: &str) -> Result<()> {
        self.write(owner, |r| r.areas.retain(|a| a.name != area_name));
        Ok(())
    }

    async fn put_rule(&self, owner: &str, rule: AvailabilityRule) -> Result<()> {
        self.write(owner, |r| {
            let id = rule.id.clone();
            upsert(&mut r.rules, rule, |x| x.id == id);
        });
        Ok(())
    }

    async fn delete_rule(&self, owner: &str, rule_id: &str) -> Result<()> {
        self.write(owner, |r| r.rules.retain(|x| x.id != rule_id));
        Ok(())
    }

    async fn put_booking(&self, owner: &str, booking: BookedSlot) -> Result<()> {
        self.write(owner, |r| {
            let id = booking.id.clone();
            upsert(&mut r.bookings, booking, |b| b.id == id);
        });
        Ok(())
    }

    async fn delete_booking(&self, owner: &str, booking_id: &str) -> Result<()> {
        self.write(owner, |r| r.bookings.retain(|b| b.id != booking_id));
        Ok(())
    }
}

#[async_trait]
impl OwnerDirectory for InMemoryStore {
    async fn resolve(&self, handle: &str) -> Result<Option<String>> {
        Ok(self.handles.read().get(handle).cloned())
    }
}
