//! Devico Core - Storefront domain model.
//!
//! This crate holds everything the Devico storefront knows about its own
//! state, independent of how it is served:
//! - [`catalog`] and [`cart`] - Products and the visitor's cart
//! - [`checkout`] - The four-step checkout wizard, its validators and totals
//! - [`navigation`] - Pages, base paths and a browser-history model
//! - [`storage`] - The self-healing JSON adapter over local storage
//! - [`scroll`] - Landing-page section snapping
//! - [`auth`] - Sign-in and sign-up form validation
//! - [`timer`] and [`carousel`] - Explicit-clock timers and autoplaying carousels
//! - [`app`] - The per-visitor state container and its command interface
//!
//! # Architecture
//!
//! The core crate contains only types and state machines - no I/O, no HTTP,
//! no clocks. Time is passed in as [`timer::Millis`] and storage goes through
//! the [`storage::Storage`] trait, so every behaviour is testable in isolation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod auth;
pub mod carousel;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod navigation;
pub mod scroll;
pub mod storage;
pub mod timer;
pub mod types;

pub use app::{Command, Effect, Overlays, Storefront};
pub use cart::{Cart, CartLineItem};
pub use catalog::{Catalog, Product};
pub use checkout::{CheckoutWizard, FieldErrors, ShippingMethod, Step};
pub use navigation::{BasePath, History, Page};
pub use storage::{MemoryStorage, PersistentStore, Storage, StorageError};
pub use types::*;
