//! `weave` - a FugueMax-style text CRDT for collaborative editing.
//!
//! Multiple replicas ("agents") edit a shared sequence of Unicode
//! characters independently and asynchronously. Local edits generate items
//! that can be replayed at remote replicas in any order consistent with
//! causal dependencies, and any two replicas that have observed the same
//! set of items converge to the exact same visible text — including
//! agreement on the relative order of characters inserted concurrently.
//!
//! # Quick Start
//!
//! ```
//! use weave::Doc;
//!
//! let mut alice = Doc::new("alice");
//! alice.local_insert_text("ABC", 0).unwrap();
//!
//! let mut bob = Doc::new("bob");
//! bob.local_insert_text("DEF", 0).unwrap();
//!
//! alice.merge_into(&bob).unwrap();
//! bob.merge_into(&alice).unwrap();
//!
//! assert_eq!(alice.string_content(), bob.string_content());
//! ```
//!
//! The engine is not internally concurrent: every operation on a [`Doc`]
//! runs to completion synchronously, and a caller exposing it to multiple
//! threads must serialize access with its own mutex (see `weave-serve` for
//! a worked example behind the `server` feature).

pub mod doc;
pub mod error;
pub mod id;
mod integrate;
mod merge;
pub mod item;

pub use doc::Doc;
pub use error::{CrdtError, Result};
pub use id::{Id, OriginLeft, OriginRight};
pub use item::Item;
