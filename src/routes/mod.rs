/**
 * Routes Module
 * API route handlers
 */
use serde::{Deserialize, Serialize};

pub mod activities;
pub mod articles;
pub mod auth;
pub mod education;
pub mod health;
pub mod messages;
pub mod pricing;
pub mod projects;
pub mod rss;
pub mod settings;
pub mod skills;
pub mod social_links;
pub mod upload;

/// Plain acknowledgment body shared by delete and logout style endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
