//! # preview-allowlist-core
//!
//! Reconciles a freshly minted deploy URL against the allow-lists of a remote
//! authorization client.
//!
//! This crate holds the decision logic only. It performs no I/O of its own:
//! the remote client is reached through the [`ClientDirectory`] trait, and the
//! run configuration arrives as an already-validated [`DeploymentContext`].
//!
//! ## Overview
//!
//! A run goes through three steps:
//! - membership check ([`is_registered`]) against `allowed_clients`
//! - URL expansion ([`expand_urls`]) of callback and logout path templates
//! - allow-list merge into an [`UpdatePayload`] submitted as one update
//!
//! The membership check gates the other two. When the deploy URL is already
//! registered the run ends without touching the remote client.
//!
//! ## Example
//!
//! ```ignore
//! use preview_allowlist_core::{DeploymentContext, Reconciler, ReconcileOutcome};
//!
//! let context = DeploymentContext::new(
//!     "https://deploy-123.example",
//!     "auth/callback",
//!     "auth/logout",
//! )
//! .with_secondary_url(Some("https://main--shop.example"));
//!
//! let reconciler = Reconciler::new(directory, "spa-client-id", context);
//! match reconciler.reconcile().await? {
//!     ReconcileOutcome::Unchanged { .. } => {}
//!     ReconcileOutcome::Updated { client, .. } => println!("{:?}", client.allowed_clients),
//!     ReconcileOutcome::Planned { .. } => {}
//! }
//! ```

mod error;
mod expand;
mod reconciler;
mod traits;
mod types;

pub use error::{DirectoryError, ReconcileError};
pub use expand::{expand_urls, expand_urls_for, is_registered};
pub use reconciler::{ReconcileOutcome, Reconciler};
pub use traits::ClientDirectory;
pub use types::{ClientRecord, DeploymentContext, UpdatePayload};
