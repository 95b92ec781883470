//! Transpiler test modules.
//!
//! Tests are organized by category:
//! - `core`: projections, predicates, joins, set operations, parameters
//! - `limits`: TOP / START AT rewrites and deterministic ordering
//! - `distinct`: DISTINCT detection and ORDER BY expansion
//! - `ddl`: schema change statements

mod ddl;
mod distinct;
mod limits;
