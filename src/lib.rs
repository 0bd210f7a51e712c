//! keyed-query: a chained hash dictionary with a prime bucket schedule and
//! a lazy, re-enumerable query pipeline over any sequence that implements
//! a two-operation cursor.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: small layers, each with one contract, composed through the
//!   cursor protocol rather than through concrete container types.
//! - Layers:
//!   - `hash`: deterministic 32-bit string hash (MurmurHash3 x86_32 over
//!     UTF-16 code units, seed 37) and the `KeyHash` capability keys
//!     implement. Numbers hash through their script-engine text (`1e+21`, `0.5`).
//!   - `schedule`: fixed table of prime bucket counts and the load factor.
//!   - `Dictionary<K, V>`: entries in a slot map, buckets as ordered chains
//!     of slot keys. Keys are hashed once; rebalancing reuses the stored
//!     hash.
//!   - `cursor`: `Cursor`/`Enumerable`, `for_each`, and the root sources
//!     (slices, materialized buffers, ranges, generators).
//!   - `query`: `Query<S>` and its operator nodes. Lazy operators wrap the
//!     parent cursor; `reverse`, `order_by*`, `distinct` and `execute`
//!     materialize into a shared buffer.
//!   - `List<T>`: indexable collection with checked positional access.
//!
//! Constraints
//! - Single-threaded: dictionaries are `!Send`/`!Sync`; query closures are
//!   shared through `Rc`.
//! - A cursor never borrows the query node that created it, so nodes can be
//!   moved, cloned and dropped while traversals are live.
//! - Each `cursor()` call is an independent traversal from the start.
//! - Programming errors (`InvalidKey`, `IndexOutOfRange`, ...) are
//!   `Err(Error)`; expected misses are `None`.
//!
//! Reentrancy policy
//! - Dictionary methods only call user code through `KeyHash` and `Eq`
//!   while probing. A debug-only guard panics if that code re-enters the
//!   same dictionary; release builds compile the guard away.
//!
//! Enumeration order
//! - Dictionary order is bucket index ascending, then insertion order
//!   within a bucket. It changes on rebalance and is not part of the
//!   contract.
//!
//! Notes and non-goals
//! - No shrinking: `remove` never reduces the bucket count.
//! - Exceeding the last schedule entry is `CapacityExceeded`, not an
//!   extension of the table.
//! - Floating point values hash but are not dictionary keys (`f64: !Eq`).
//!
//! Logging
//! - With the default `tracing` feature, rebalances, schedule exhaustion
//!   and materializing operators emit `tracing` events. No subscriber is
//!   installed.

mod dictionary_proptest;
mod probe_guard;

pub mod cursor;
pub mod dictionary;
pub mod error;
pub mod hash;
pub mod list;
pub mod query;
pub mod schedule;

// Public surface
pub use cursor::{empty, for_each, generate, range, range_between, range_step, Cursor, Enumerable};
pub use dictionary::Dictionary;
pub use error::{Error, Result};
pub use hash::{hash_boolean, hash_number, hash_string, KeyHash, DEFAULT_SEED};
pub use list::List;
pub use query::{IntoQuery, Numeric, Orderable, Query};
