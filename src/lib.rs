//! Project-scoped context store for AI coding agents.
//!
//! Dossier is an [MCP](https://modelcontextprotocol.io/) server and REST API that
//! lets a coding assistant record short notes ("contexts") — architecture
//! decisions, TODOs, tech debt, code patterns — and retrieve them later, possibly
//! from a different session or a different tool.
//!
//! Every context is identified by a `(project, key)` pair with create-or-replace
//! semantics. Retrieval is by exact key, by tag, or (optionally) by semantic
//! similarity over embedded content. Reads of a single context are annotated with
//! a short usage directive derived from its tags and priority.
//!
//! # Architecture
//!
//! - **Storage**: SQLite with [sqlite-vec](https://github.com/asg017/sqlite-vec)
//!   for vector similarity search
//! - **Embeddings**: optional external provider over HTTP (OpenAI-compatible),
//!   degrades gracefully when unreachable
//! - **Transport**: MCP over stdio, or a plain REST API
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization, schema, and migrations
//! - [`embedding`] — Text-to-vector embedding via an external provider
//! - [`context`] — Core engine: store, query, search, tags, summaries, instructions
//! - [`http`] — REST transport
//! - [`tools`] — MCP tool surface
//! - [`server`] — wiring for the stdio and HTTP servers

pub mod config;
pub mod context;
pub mod db;
pub mod embedding;
pub mod http;
pub mod server;
pub mod tools;
