use crate::path::{AnchoredPath, PersistedPath};

/// Cached geometry of one drawn shape, tracking whether the store has it yet.
///
/// Edits replace the whole path and mark it dirty. Once the store
/// acknowledges a write the stored absolute form becomes the source of truth,
/// so a reload never re-applies the origin to already absolute points.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SiteGeometry {
    #[default]
    Empty,
    /// Edited locally, not yet acknowledged by the store.
    Dirty(AnchoredPath),
    /// As read back from (or acknowledged by) the store.
    Confirmed(PersistedPath),
}

impl SiteGeometry {
    /// Replace the geometry with a fresh edit.
    pub fn edit(&mut self, path: AnchoredPath) {
        *self = SiteGeometry::Dirty(path);
    }

    pub fn clear(&mut self) {
        *self = SiteGeometry::Empty;
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self, SiteGeometry::Dirty(_))
    }

    /// Absolute form to write, if there is an unsaved edit.
    pub fn pending_write(&self) -> Option<PersistedPath> {
        match self {
            SiteGeometry::Dirty(path) => Some(path.to_persisted()),
            _ => None,
        }
    }

    /// Record what the store now holds.
    pub fn confirm(&mut self, stored: PersistedPath) {
        *self = SiteGeometry::Confirmed(stored);
    }

    /// Anchored view of whatever is cached.
    pub fn anchored(&self) -> Option<AnchoredPath> {
        match self {
            SiteGeometry::Empty => None,
            SiteGeometry::Dirty(path) => Some(path.clone()),
            SiteGeometry::Confirmed(stored) => Some(stored.to_anchored()),
        }
    }
}
