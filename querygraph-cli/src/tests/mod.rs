//! Unit tests for querygraph-cli, organized by module.
//!
//! Each submodule documents the behaviour under test.
