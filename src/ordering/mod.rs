//! Dense display ordering for catalog collections
//!
//! An [`OrderedCollection`] owns the `order` field of every record in one
//! collection and keeps it equal to `{1..N}` after each mutation. All
//! mutating calls on one collection queue behind a single writer lock, so
//! shifts from two concurrent requests never interleave inside this process.
//! Every mutation ends with a normalization sweep that repairs drift left by
//! an earlier failed write or by a second process sharing the database.
//!
//! ```rust,ignore
//! let sliders = OrderedCollection::new(Arc::new(InMemoryDataService::<Slider>::new()));
//! sliders.insert_at(banner, Some(1)).await?;
//! let sorted = sliders.move_to(&banner_id, 3).await?;
//! ```

pub mod plan;

use crate::core::{DataService, EntityError, Orderable, ShopError, ShopResult};
use plan::Shift;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Position manager for one collection
pub struct OrderedCollection<T: Orderable> {
    store: Arc<dyn DataService<T>>,
    writer: Arc<Mutex<()>>,
}

impl<T: Orderable> Clone for OrderedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            writer: self.writer.clone(),
        }
    }
}

impl<T: Orderable> OrderedCollection<T> {
    pub fn new(store: Arc<dyn DataService<T>>) -> Self {
        Self {
            store,
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Underlying storage, for read paths that do not care about order
    pub fn store(&self) -> &Arc<dyn DataService<T>> {
        &self.store
    }

    /// All records sorted by position
    pub async fn list(&self) -> ShopResult<Vec<T>> {
        let mut records = self.store.list().await?;
        plan::sort_by_position(&mut records);
        Ok(records)
    }

    /// Storefront view: active records only, still in display order
    pub async fn list_active(&self) -> ShopResult<Vec<T>> {
        let mut records = self.list().await?;
        records.retain(Orderable::is_active);
        Ok(records)
    }

    pub async fn get(&self, id: &Uuid) -> ShopResult<T> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| not_found::<T>(*id))
    }

    /// Insert `record` at `desired` (appended when `None`), clamped to `[1, N+1]`.
    pub async fn insert_at(&self, mut record: T, desired: Option<i64>) -> ShopResult<Vec<T>> {
        let _guard = self.writer.lock().await;

        let records = self.list().await?;
        let position = plan::clamp_insert(desired, records.len());

        self.persist(&records, &plan::plan_insert(&records, position))
            .await?;

        record.set_order(position);
        let id = record.id();
        self.store.create(record).await?;

        info!(
            collection = T::resource_name(),
            %id,
            position,
            "inserted record"
        );
        self.normalize_locked().await
    }

    /// Move a record to `desired`, clamped to `[1, N]`.
    ///
    /// Asking for the current position writes nothing.
    pub async fn move_to(&self, id: &Uuid, desired: i64) -> ShopResult<Vec<T>> {
        let _guard = self.writer.lock().await;
        self.move_locked(id, desired).await
    }

    /// Apply a field patch, then optionally reposition.
    ///
    /// `patch` cannot change the position: whatever it does to `order` is
    /// reverted before the record is stored. Repositioning goes through the
    /// same path as [`move_to`](Self::move_to).
    pub async fn update<F>(&self, id: &Uuid, patch: F, position: Option<i64>) -> ShopResult<Vec<T>>
    where
        F: FnOnce(&mut T) + Send,
    {
        let _guard = self.writer.lock().await;

        let mut record = self.get(id).await?;
        let order = record.order();
        patch(&mut record);
        if record.order() != order {
            record.set_order(order);
        }
        self.store.update(id, record).await?;

        match position {
            Some(desired) => self.move_locked(id, desired).await,
            None => self.normalize_locked().await,
        }
    }

    /// Delete a record and close the gap it leaves.
    pub async fn remove(&self, id: &Uuid) -> ShopResult<Vec<T>> {
        let _guard = self.writer.lock().await;

        let removed = self.get(id).await?;
        self.store.delete(id).await?;

        let remaining = self.list().await?;
        self.persist(&remaining, &plan::plan_remove(&remaining, removed.order()))
            .await?;

        info!(
            collection = T::resource_name(),
            %id,
            position = removed.order(),
            "removed record"
        );
        self.normalize_locked().await
    }

    /// Rewrite positions to `index + 1` in `(order, created_at)` order.
    pub async fn normalize(&self) -> ShopResult<Vec<T>> {
        let _guard = self.writer.lock().await;
        self.normalize_locked().await
    }

    async fn move_locked(&self, id: &Uuid, desired: i64) -> ShopResult<Vec<T>> {
        let records = self.list().await?;
        let target = records
            .iter()
            .find(|r| r.id() == *id)
            .ok_or_else(|| not_found::<T>(*id))?;

        let from = target.order();
        let to = plan::clamp_move(desired, records.len());
        if from == to {
            debug!(collection = T::resource_name(), %id, position = from, "move is a no-op");
            return Ok(records);
        }

        self.persist(&records, &plan::plan_move(&records, *id, from, to))
            .await?;

        info!(
            collection = T::resource_name(),
            %id,
            from,
            to,
            "moved record"
        );
        self.normalize_locked().await
    }

    async fn normalize_locked(&self) -> ShopResult<Vec<T>> {
        let mut records = self.list().await?;
        let shifts = plan::plan_normalize(&records);
        if !shifts.is_empty() {
            debug!(
                collection = T::resource_name(),
                rewrites = shifts.len(),
                "normalizing positions"
            );
            self.persist(&records, &shifts).await?;
            plan::apply(&mut records, &shifts);
        }
        Ok(records)
    }

    /// Write each shift to storage. Stops at the first failure; the next
    /// normalization pass repairs whatever was left half-shifted.
    async fn persist(&self, snapshot: &[T], shifts: &[Shift]) -> ShopResult<()> {
        for shift in shifts {
            let Some(record) = snapshot.iter().find(|r| r.id() == shift.id) else {
                continue;
            };
            let mut record = record.clone();
            record.set_order(shift.to);
            debug!(
                collection = T::resource_name(),
                id = %shift.id,
                from = shift.from,
                to = shift.to,
                "shift"
            );
            self.store.update(&shift.id, record).await?;
        }
        Ok(())
    }
}

fn not_found<T: Orderable>(id: Uuid) -> ShopError {
    EntityError::NotFound {
        entity_type: T::resource_name_singular().to_string(),
        id,
    }
    .into()
}
