//! sea-orm entities for the academic records schema.
//!
//! Relations are declared by hand so each module reads on its own; the
//! tables themselves are created by the `migration` crate.

pub mod db;
pub mod year;
pub mod semester;
pub mod discipline;
pub mod class;
pub mod user;
pub mod grade;
