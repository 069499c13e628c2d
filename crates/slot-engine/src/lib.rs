//! # slot-engine
//!
//! Appointment slot computation for owners who work across several locations.
//!
//! An owner publishes weekly availability rules. Customers book fixed-length
//! slots at a location. When two locations share an area, a booking at one
//! blocks the other for the booking's duration plus a travel buffer on each
//! side. Everything here runs on naive local wall-clock time in a single
//! implicit timezone.
//!
//! ## Modules
//!
//! - [`interval`]: half-open minute intervals: overlap and subtraction
//! - [`expander`]: weekly rules → open intervals for a date
//! - [`conflict`]: bookings → forbidden intervals, with travel buffers
//! - [`slots`]: open minus forbidden → aligned fixed-length slots
//! - [`calendar`]: which days of a month have any rule
//! - [`store`]: storage and identity collaborator traits, in-memory store
//! - [`cache`]: TTL read-through cache of owner records
//! - [`availability`]: store-backed queries and booking writes
//! - [`config`]: engine tuning
//! - [`error`]: error types

pub mod availability;
pub mod cache;
pub mod calendar;
pub mod config;
pub mod conflict;
pub mod error;
pub mod expander;
pub mod interval;
pub mod model;
pub mod slots;
pub mod store;

pub use availability::AvailabilityService;
pub use calendar::available_days;
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use interval::{overlaps, subtract, Interval};
pub use model::{Area, AvailabilityRule, BookedSlot, Location, NewBooking, OwnerRecords, TimeSlot};
pub use slots::{compute_slots, DEFAULT_SLOT_MINUTES};
pub use store::{InMemoryStore, OwnerDirectory, RecordStore};
