//! Grammar productions for the PL/SQL dialect.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! Items are tried as declarations first and statements second; SQL is parsed
//! structurally, not skipped as opaque text.

mod atoms;
mod directives;
mod expressions;
mod items;
mod sql;
mod statements;
