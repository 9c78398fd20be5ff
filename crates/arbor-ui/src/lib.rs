#![allow(non_snake_case)]
//! # Widgets over a retained scene graph
//!
//! Widget constructors are plain functions taking a [`BuildCx`] and a spec
//! struct. They size themselves from their content ([`sizing`]), create nodes
//! and primitives in the graph, attach one interaction callback
//! ([`interaction`]) and return a handle.
//!
//! ```rust
//! use std::rc::Rc;
//! use arbor_text::ApproxMetrics;
//! use arbor_ui::*;
//!
//! let mut ui = Ui::new(Rc::new(ApproxMetrics::default()));
//! let apply = ui.build(|cx| {
//!     let mut apply = WidgetHandle::invalid();
//!     Column(cx, SizeSpec::default(), |cx| {
//!         Text(cx, TextSpec::new("Volume"));
//!         Slider(cx, SliderSpec::new(0.5));
//!         apply = Button(cx, ButtonSpec::new("Apply").key("apply"));
//!     });
//!     apply
//! });
//! assert!(apply.is_valid());
//! assert_eq!(ui.focus(apply.root), true);
//! ```
//!
//! Callbacks mutate primitives in place. Changes that alter the tree's
//! shape (expanding a tree row) raise a rebuild request instead; the owner
//! checks [`Ui::needs_rebuild`] and builds again, and focus follows widget
//! identity across the rebuild.

pub mod columns;
pub mod config;
pub mod context;
pub mod interaction;
pub mod runtime;
pub mod scroll;
pub mod sizing;
pub mod tests;
pub mod textfield;
pub mod tree_view;
pub mod widgets;

pub use arbor_core::*;

pub use columns::{ColumnWidth, distribute};
pub use config::{Clock, ManualClock, SystemClock, UiConfig};
pub use context::{BuildCx, Memory, RebuildFlag};
pub use interaction::{Behavior, InteractionState, Interactive, PressModel, Response, Step};
pub use runtime::Ui;
pub use scroll::{ScrollMetrics, ScrollView, ScrollViewHandle, ScrollViewSpec, ScrollViewState, remember_scroll_state};
pub use sizing::{Inferred, SizeRules, TextContent, infer};
pub use textfield::{TextField, TextFieldHandle, TextFieldSpec, TextFieldState};
pub use tree_view::{FlatRow, RowPath, TreeNode, TreeRowInfo, TreeView, TreeViewHandle, TreeViewSpec, TreeViewState};
pub use widgets::*;

/// What a widget constructor hands back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WidgetHandle {
    /// Interaction root; null when construction failed.
    pub root: NodeId,
    /// Where children go, for containers. Equals `root` otherwise.
    pub content: NodeId,
}

impl WidgetHandle {
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            content: root,
        }
    }

    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.root.is_valid()
    }
}
