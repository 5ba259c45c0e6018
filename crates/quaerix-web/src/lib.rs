//! quaerix-web — HTTP API for the Quaerix question-answering platform.
//! Routes fall into four groups:
//!   - page data endpoints (`/landing/data`, `/questions/data`, ...)
//!   - question lifecycle (create, edit, delete, subgraph)
//!   - job submission and polling (`POST /q/{id}`, `/status/{task_id}`, `/tasks`)
//!   - answer browsing and feedback

pub mod auth;
pub mod config;
pub mod handlers;
pub mod jobs;
pub mod router;
pub mod state;
