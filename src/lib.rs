//! # Pantry
//!
//! Ingredient matching and reconciliation for a recipe app: normalizes
//! free-text ingredient lines, fuzzy-matches them against a user's pantry
//! library, and computes what still needs to be bought, grouped for a
//! shopping list.
//!
//! The pure core lives in [`normalizer`], [`fuzzy`], [`library`],
//! [`reconcile`] and [`categorizer`]. The remaining modules wire it to
//! Postgres and a Telegram bot.

pub mod alerts;
pub mod bot;
pub mod categorizer;
pub mod config;
pub mod db;
pub mod dish;
pub mod errors;
pub mod fuzzy;
pub mod library;
pub mod localization;
pub mod measurement_patterns;
pub mod normalizer;
pub mod recompute;
pub mod reconcile;
pub mod telemetry;
