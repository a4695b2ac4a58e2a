/*!
 * # Editing Core Module
 *
 * The live document the editing surface works on, and the commands that
 * mutate it.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: the Document Tree
 * - The whole document is one [`Node`](crate::model::Node) tree owned by
 *   [`Document`]; there are no shared or global editor instances
 * - Every node carries a stable [`NodeId`](crate::model::NodeId) assigned at
 *   creation, so selections survive tree surgery
 * - Markdown text is only a projection: `to_markdown()` serializes on demand
 *
 * ### 2. Command-Based Editing
 * - Structural edits are [`Cmd`] values (insert heading, toggle bold, the
 *   "new block" key, ...) applied through [`Document::apply`]
 * - Raw host mutations (paste, drag-drop) go through [`Document::edit_tree`]
 * - Both end with an explicit, synchronous normalize pass: mutation is
 *   always followed by repair, never observed after the fact
 *
 * ### 3. Selection Bookkeeping
 * - The caret is a [`Selection`]: a node id plus character (or child slot)
 *   offsets, never a live pointer into the tree
 * - The normalizer re-resolves it after every repair; when it cannot, the
 *   selection is unset and the host may call
 *   [`Document::place_caret_at_end`]
 *
 * ## Module Structure
 *
 * - **`document`**: `Document`, document statistics
 * - **`commands`**: `Cmd` enum and the edit operations behind it
 * - **`selection`**: `Selection`
 * - **`patch`**: what an applied command changed
 *
 * ## Usage Pattern
 *
 * ```rust
 * use richmark_engine::editing::*;
 *
 * let mut doc = Document::from_markdown("# Hello\n\n- Item 1\n- Item 2");
 *
 * let patch = doc.apply(Cmd::InsertHorizontalRule);
 * assert_eq!(patch.version, doc.version());
 *
 * let saved = doc.to_markdown();
 * assert!(saved.contains("---"));
 * ```
 */

pub mod commands;
pub mod document;
pub mod patch;
pub mod selection;

pub use commands::Cmd;
pub use document::{Document, Stats};
pub use patch::Patch;
pub use selection::Selection;
