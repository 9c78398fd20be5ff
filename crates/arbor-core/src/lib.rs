//! # Scene graph contract
//!
//! `arbor-core` holds everything the widget layer consumes but does not own:
//!
//! - [`SceneGraph`]: create nodes, attach [`Primitive`]s, install a
//!   [`NodeCallback`], remove subtrees. [`NodeStore`] is the in-memory
//!   implementation.
//! - [`InputEvent`]: the record a callback receives.
//! - [`StyleToken`] / [`Theme`]: token → style lookup table.
//! - [`FocusManager`] and the identity [`Reconciler`] that carries focus
//!   across full-tree rebuilds.
//!
//! ```rust
//! use arbor_core::*;
//!
//! let mut g = NodeStore::new();
//! let root = g.create_node(None);
//! let label = g.add_primitive(
//!     root,
//!     TextPrimitive::new(Rect::ZERO, "hi", StyleToken::Text).into(),
//! );
//! assert_eq!(g.primitive(label).and_then(|p| p.text()), Some("hi"));
//!
//! g.remove_subtree(root);
//! assert!(g.primitive(label).is_none());
//! assert!(!g.create_node(Some(root)).is_valid());
//! ```

pub mod color;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod graph;
pub mod guard;
pub mod identity;
pub mod input;
pub mod size;
pub mod store;
pub mod theme;

pub use color::*;
pub use error::*;
pub use focus::*;
pub use geometry::*;
pub use graph::*;
pub use guard::*;
pub use identity::*;
pub use input::*;
pub use size::*;
pub use store::*;
pub use theme::*;

pub use arbor_text::{TextStyle, WrapMode};
