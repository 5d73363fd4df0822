//! Debug hosts that make an otherwise off-screen surface visible.
//!
//! A handle created with `visible = true` attaches its surface to the
//! injected [`DebugSurfaceHost`] once, refreshes it after every update, and
//! detaches it when the handle is disposed or dropped.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::surface::Surface;

/// Stacking order given to debug overlays.
pub const OVERLAY_Z_INDEX: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Block,
    None,
}

/// Presentation style of a debug surface: pinned to the viewport origin above
/// the scene, shown only when requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceStyle {
    pub top: i32,
    pub left: i32,
    pub z_index: i32,
    pub display: DisplayMode,
}

impl SurfaceStyle {
    pub fn overlay(visible: bool) -> Self {
        Self {
            top: 0,
            left: 0,
            z_index: OVERLAY_Z_INDEX,
            display: if visible { DisplayMode::Block } else { DisplayMode::None },
        }
    }

    pub fn is_displayed(&self) -> bool {
        self.display == DisplayMode::Block
    }
}

impl fmt::Display for SurfaceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display = match self.display {
            DisplayMode::Block => "block",
            DisplayMode::None => "none",
        };
        write!(
            f,
            "position: fixed; top: {}px; left: {}px; z-index: {}; display: {}",
            self.top, self.left, self.z_index, display
        )
    }
}

/// Identifier a host hands out for an attached surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

impl ElementId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability to show a surface somewhere a developer can see it.
pub trait DebugSurfaceHost {
    fn attach(
        &mut self,
        label: &str,
        style: &SurfaceStyle,
        surface: &Surface,
    ) -> Result<ElementId>;

    /// Called after each update of an attached surface.
    fn refresh(&mut self, _id: ElementId, _surface: &Surface) -> Result<()> {
        Ok(())
    }

    fn detach(&mut self, id: ElementId) -> Result<()>;
}

/// Snapshot of one element inside a [`DebugDocument`].
#[derive(Debug, Clone)]
pub struct DebugElement {
    pub label: String,
    pub style: SurfaceStyle,
    pub content: Surface,
    pub refreshes: usize,
}

#[derive(Debug, Default)]
struct DocumentTree {
    next_id: u64,
    elements: BTreeMap<ElementId, DebugElement>,
}

/// In-memory stand-in for a visible document tree.
///
/// Clones share the same tree, so one clone can be handed to a canvas
/// texture while another is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct DebugDocument {
    tree: Rc<RefCell<DocumentTree>>,
}

impl DebugDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tree.borrow().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.tree.borrow().elements.contains_key(&id)
    }

    pub fn element(&self, id: ElementId) -> Option<DebugElement> {
        self.tree.borrow().elements.get(&id).cloned()
    }

    pub fn labels(&self) -> Vec<String> {
        self.tree
            .borrow()
            .elements
            .values()
            .map(|element| element.label.clone())
            .collect()
    }
}

impl DebugSurfaceHost for DebugDocument {
    fn attach(
        &mut self,
        label: &str,
        style: &SurfaceStyle,
        surface: &Surface,
    ) -> Result<ElementId> {
        let mut tree = self.tree.borrow_mut();
        tree.next_id += 1;
        let id = ElementId(tree.next_id);
        tree.elements.insert(
            id,
            DebugElement {
                label: label.to_string(),
                style: *style,
                content: surface.clone(),
                refreshes: 0,
            },
        );
        Ok(id)
    }

    fn refresh(&mut self, id: ElementId, surface: &Surface) -> Result<()> {
        let mut tree = self.tree.borrow_mut();
        let element = tree
            .elements
            .get_mut(&id)
            .with_context(|| format!("element {id} is not attached"))?;
        element.content = surface.clone();
        element.refreshes += 1;
        Ok(())
    }

    fn detach(&mut self, id: ElementId) -> Result<()> {
        self.tree
            .borrow_mut()
            .elements
            .remove(&id)
            .map(|_| ())
            .with_context(|| format!("element {id} is not attached"))
    }
}

/// Writes each visible surface to `<dir>/<label>-<id>.png`, rewriting it on
/// every refresh and deleting it on detach.
#[derive(Debug)]
pub struct SnapshotHost {
    directory: PathBuf,
    next_id: u64,
    files: BTreeMap<ElementId, PathBuf>,
}

impl SnapshotHost {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            next_id: 0,
            files: BTreeMap::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_of(&self, id: ElementId) -> Option<&Path> {
        self.files.get(&id).map(PathBuf::as_path)
    }
}

impl DebugSurfaceHost for SnapshotHost {
    fn attach(
        &mut self,
        label: &str,
        _style: &SurfaceStyle,
        surface: &Surface,
    ) -> Result<ElementId> {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        let path = self
            .directory
            .join(format!("{}-{}.png", file_stem(label), id.get()));
        surface
            .save_png(&path)
            .with_context(|| format!("failed to write debug snapshot for '{label}'"))?;
        tracing::debug!(label, path = %path.display(), "attached debug snapshot");
        self.files.insert(id, path);
        Ok(id)
    }

    fn refresh(&mut self, id: ElementId, surface: &Surface) -> Result<()> {
        let path = self
            .files
            .get(&id)
            .with_context(|| format!("snapshot {id} is not attached"))?;
        surface
            .save_png(path)
            .with_context(|| format!("failed to refresh debug snapshot {}", path.display()))?;
        Ok(())
    }

    fn detach(&mut self, id: ElementId) -> Result<()> {
        let path = self
            .files
            .remove(&id)
            .with_context(|| format!("snapshot {id} is not attached"))?;
        std::fs::remove_file(&path)
            .with_context(|| format!("failed to remove debug snapshot {}", path.display()))
    }
}

fn file_stem(label: &str) -> String {
    let stem: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        "surface".to_string()
    } else {
        stem.to_string()
    }
}
