// Copyright 2026 Cortex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Recipe import library: sign in to a recipe site and extract every
//! saved recipe into structured records.
//!
//! Two operations share one credential artifact, the session token:
//! - login: [`auth::Authenticator`] turns credentials into a token.
//! - import: [`import::Importer`] crawls the paginated listing with the
//!   token, then extracts one [`model::RecipeRecord`] per detail page.

pub mod auth;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod http_client;
pub mod import;
pub mod model;
pub mod protocol;
pub mod renderer;
pub mod rest;
pub mod site;
