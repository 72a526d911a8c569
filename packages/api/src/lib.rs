//! # API crate: backend client and domain logic for Agito
//!
//! Everything the Agito web client knows about its data lives here, free of any UI
//! code: the client for the hosted Backend-as-a-Service, typed rows, one service
//! module per table, and the pure logic pages share (prices, validation, the
//! checkout flow, map geometry).
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`backend`] | HTTP/WebSocket client: auth, table queries and RPC, storage buckets, realtime channels |
//! | [`config`] | Backend URL and keys from the environment |
//! | [`error`] | [`BackendError`], the error every backend call returns |
//! | [`models`] | Table rows and the optimistic client-side state built on them |
//! | [`services`] | Typed operations per table (`profiles`, `events`, `follows`, …) |
//! | [`money`] | [`Money`], BRL amounts in centavos |
//! | [`validate`] | Form validation with field-level, user-facing messages |
//! | [`checkout`] | [`CheckoutDraft`], the multi-step ticket purchase |
//! | [`geo`] | Distances, bounding boxes and map URLs |
//!
//! ## Targets
//!
//! The crate compiles for both the browser (`wasm32`) and native targets. Realtime
//! subscriptions need a browser WebSocket and return
//! [`BackendError::Unsupported`] elsewhere; everything else works on both, which is
//! what the unit tests rely on.

pub mod backend;
pub mod checkout;
pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod money;
pub mod services;
pub mod validate;

pub use backend::auth::{AuthUser, Session, SignUp, UserAttributes};
pub use backend::realtime::{Change, ChangeKind, Channel};
pub use backend::Backend;
pub use checkout::{CheckoutDraft, CheckoutStep, PaymentChoice, PurchaseRequest};
pub use config::BackendConfig;
pub use error::{BackendError, Result};
pub use money::Money;
pub use validate::ValidationError;
