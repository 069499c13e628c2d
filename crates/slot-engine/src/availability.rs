//! Store-backed availability queries and booking writes.
//!
//! [`AvailabilityService`] is what booking and admin front ends talk to. It
//! fetches an owner's records (through an optional TTL cache), runs the pure
//! computations in [`crate::slots`] and [`crate::calendar`], and routes writes
//! to the store, invalidating the cache after each one.
//!
//! Read paths degrade gracefully: an unknown location, a closed weekday or an
//! unresolvable handle all produce an empty list. Store failures are always
//! returned as [`EngineError::Storage`] (or whatever the store reports) so a
//! caller can tell "no slots" from "could not determine slots".

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::RecordCache;
use crate::calendar;
use crate::config::EngineConfig;
use crate::conflict::booking_interval;
use crate::error::{EngineError, Result};
use crate::expander::rule_interval;
use crate::interval::{format_clock, format_date, parse_clock, parse_date, Interval};
use crate::model::{Area, AvailabilityRule, BookedSlot, Location, NewBooking, OwnerRecords, TimeSlot};
use crate::slots;
use crate::store::{fetch_owner_records, OwnerDirectory, RecordStore};

pub struct AvailabilityService<S: ?Sized> {
    store: Arc<S>,
    cache: Option<RecordCache>,
    config: EngineConfig,
}

impl<S> AvailabilityService<S>
where
    S: RecordStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: EngineConfig) -> Self {
        Self {
            store,
            cache: config.cache_ttl.map(RecordCache::new),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&RecordCache> {
        self.cache.as_ref()
    }

    /// Records for `owner`, served from the cache while fresh.
    pub async fn records(&self, owner: &str) -> Result<Arc<OwnerRecords>> {
        if let Some(records) = self.cache.as_ref().and_then(|c| c.get(owner)) {
            return Ok(records);
        }
        self.fresh_records(owner).await
    }

    /// Records for `owner` straight from the store. Refreshes the cache.
    ///
    /// Records read while a write was landing are returned but not cached.
    pub async fn fresh_records(&self, owner: &str) -> Result<Arc<OwnerRecords>> {
        let ticket = self.cache.as_ref().map(RecordCache::ticket);
        let records = Arc::new(fetch_owner_records(self.store.as_ref(), owner).await?);
        if let (Some(cache), Some(ticket)) = (&self.cache, ticket) {
            cache.insert(owner, Arc::clone(&records), ticket);
        }
        Ok(records)
    }

    fn invalidate(&self, owner: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(owner);
        }
    }

    /// Bookable slots for a location on a date, ascending by start time.
    ///
    /// `slot_minutes` defaults to [`EngineConfig::slot_minutes`].
    ///
    /// # Errors
    /// Only store failures. Every "nothing available" condition is `Ok(vec![])`.
    pub async fn compute_available_slots(
        &self,
        owner: &str,
        location_id: &str,
        date: NaiveDate,
        slot_minutes: Option<u32>,
    ) -> Result<Vec<TimeSlot>> {
        let records = self.records(owner).await?;
        Ok(slots::compute_slots_with_tolerance(
            &records,
            location_id,
            date,
            slot_minutes.unwrap_or(self.config.slot_minutes),
            self.config.buffer_edge_tolerance_minutes,
        ))
    }

    /// Days of `month` (1-based) in `year` whose weekday has a rule.
    ///
    /// # Errors
    /// Only store failures.
    pub async fn compute_available_days(&self, owner: &str, month: u32, year: i32) -> Result<Vec<NaiveDate>> {
        let records = self.records(owner).await?;
        Ok(calendar::available_days(&records.rules, year, month))
    }

    /// [`Self::compute_available_slots`] for the owner behind a public handle.
    pub async fn slots_for_handle<D>(
        &self,
        directory: &D,
        handle: &str,
        location_id: &str,
        date: NaiveDate,
        slot_minutes: Option<u32>,
    ) -> Result<Vec<TimeSlot>>
    where
        D: OwnerDirectory + ?Sized,
    {
        match directory.resolve(handle).await? {
            Some(owner) => {
                self.compute_available_slots(&owner, location_id, date, slot_minutes)
                    .await
            }
            None => {
                debug!(handle, "unknown owner handle; no slots");
                Ok(Vec::new())
            }
        }
    }

    /// [`Self::compute_available_days`] for the owner behind a public handle.
    pub async fn days_for_handle<D>(&self, directory: &D, handle: &str, month: u32, year: i32) -> Result<Vec<NaiveDate>>
    where
        D: OwnerDirectory + ?Sized,
    {
        match directory.resolve(handle).await? {
            Some(owner) => self.compute_available_days(&owner, month, year).await,
            None => {
                debug!(handle, "unknown owner handle; no available days");
                Ok(Vec::new())
            }
        }
    }

    /// Bookings on `date` across all locations, ordered by start time.
    pub async fn bookings_on(&self, owner: &str, date: NaiveDate) -> Result<Vec<BookedSlot>> {
        let records = self.records(owner).await?;
        let mut bookings: Vec<BookedSlot> = records
            .bookings
            .iter()
            .filter(|b| parse_date(&b.date).is_ok_and(|d| d == date))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| parse_clock(&b.start_time).unwrap_or(i64::MAX));
        Ok(bookings)
    }

    /// Book `slot` at `location_id` on `date`.
    ///
    /// Availability is recomputed from fresh store data, bypassing the cache,
    /// and the slot must still be offered. This narrows the window for double
    /// bookings but does not close it; concurrent writers still race and the
    /// last write wins.
    ///
    /// # Errors
    /// - `InvalidBooking` for a blank name, a malformed email or a malformed slot.
    /// - `UnknownLocation` if the location does not exist.
    /// - `SlotUnavailable` if the slot is no longer offered.
    /// - Store failures.
    pub async fn book_slot(
        &self,
        owner: &str,
        location_id: &str,
        date: NaiveDate,
        slot: &TimeSlot,
        customer: NewBooking,
    ) -> Result<BookedSlot> {
        validate_customer(&customer)?;

        let window = Interval::from_clock(&slot.start_time, &slot.end_time)
            .map_err(|e| EngineError::InvalidBooking(e.to_string()))?;
        if window.is_empty() {
            return Err(EngineError::InvalidBooking(format!(
                "slot end {} is not after start {}",
                slot.end_time, slot.start_time
            )));
        }

        let records = self.fresh_records(owner).await?;
        if records.location(location_id).is_none() {
            return Err(EngineError::UnknownLocation(location_id.to_string()));
        }

        let offered = slots::compute_slots_with_tolerance(
            &records,
            location_id,
            date,
            window.duration_minutes() as u32,
            self.config.buffer_edge_tolerance_minutes,
        );
        let still_offered = offered
            .iter()
            .any(|s| Interval::from_clock(&s.start_time, &s.end_time).is_ok_and(|w| w == window));
        if !still_offered {
            return Err(EngineError::SlotUnavailable {
                start: slot.start_time.clone(),
                end: slot.end_time.clone(),
            });
        }

        let booking = BookedSlot {
            id: Uuid::new_v4().to_string(),
            location_id: location_id.to_string(),
            date: format_date(date),
            start_time: format_clock(window.start),
            end_time: format_clock(window.end),
            customer_name: customer.customer_name.trim().to_string(),
            customer_email: customer.customer_email.trim().to_string(),
        };
        self.store.put_booking(owner, booking.clone()).await?;
        self.invalidate(owner);

        info!(
            booking_id = %booking.id,
            location_id,
            date = %booking.date,
            start = %booking.start_time,
            "booked slot"
        );
        Ok(booking)
    }

    /// Store a booking as-is, e.g. one entered by the owner from the admin view.
    ///
    /// Only the record's own shape is checked; conflicts are not.
    ///
    /// # Errors
    /// `InvalidDate` / `InvalidBooking` for malformed fields, or store failures.
    pub async fn save_booking(&self, owner: &str, booking: BookedSlot) -> Result<()> {
        parse_date(&booking.date)?;
        booking_interval(&booking)?;
        self.store.put_booking(owner, booking).await?;
        self.invalidate(owner);
        Ok(())
    }

    pub async fn remove_booking(&self, owner: &str, booking_id: &str) -> Result<()> {
        self.store.delete_booking(owner, booking_id).await?;
        self.invalidate(owner);
        Ok(())
    }

    pub async fn save_location(&self, owner: &str, location: Location) -> Result<()> {
        self.store.put_location(owner, location).await?;
        self.invalidate(owner);
        Ok(())
    }

    pub async fn remove_location(&self, owner: &str, location_id: &str) -> Result<()> {
        self.store.delete_location(owner, location_id).await?;
        self.invalidate(owner);
        Ok(())
    }

    pub async fn save_area(&self, owner: &str, area: Area) -> Result<()> {
        self.store.put_area(owner, area).await?;
        self.invalidate(owner);
        Ok(())
    }

    pub async fn remove_area(&self, owner: &str, area_name: &str) -> Result<()> {
        self.store.delete_area(owner, area_name).await?;
        self.invalidate(owner);
        Ok(())
    }

    /// # Errors
    /// `InvalidRule` if the weekday or window is malformed; the store is not touched.
    pub async fn save_rule(&self, owner: &str, rule: AvailabilityRule) -> Result<()> {
        rule_interval(&rule)?;
        self.store.put_rule(owner, rule).await?;
        self.invalidate(owner);
        Ok(())
    }

    pub async fn remove_rule(&self, owner: &str, rule_id: &str) -> Result<()> {
        self.store.delete_rule(owner, rule_id).await?;
        self.invalidate(owner);
        Ok(())
    }
}

fn validate_customer(customer: &NewBooking) -> Result<()> {
    if customer.customer_name.trim().is_empty() {
        return Err(EngineError::InvalidBooking("customer name is empty".to_string()));
    }
    let email = customer.customer_email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !well_formed {
        return Err(EngineError::InvalidBooking(format!(
            "customer email '{}' is not an address",
            email
        )));
    }
    Ok(())
}
