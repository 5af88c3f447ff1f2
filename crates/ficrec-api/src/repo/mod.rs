//! Data access layer
//!
//! Plain query functions grouped per table family. Functions that must share
//! a transaction with their caller take `&mut SqliteConnection`; the rest
//! take the pool.

pub mod comments;
pub mod reactions;
pub mod recommendations;
pub mod refdata;
pub mod users;
