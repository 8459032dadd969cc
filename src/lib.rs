// Announcement slot
pub mod announcement;

// Dashboard state record
pub mod dashboard;

// Voice requests and intent dispatch
pub mod voice;

// HTTP API
pub mod api;

// Configuration
pub mod config;
