//! `SeaORM` entities for `SqliteStore`.

pub mod purge_state;
