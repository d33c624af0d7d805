//! Edit sessions: the begin/commit bracket around one mesh edit.
//!
//! A session borrows the mesh mutably for its whole lifetime, which is what
//! serializes access during an operation. There is no rollback: every change
//! made through the session is applied in place immediately, and dropping an
//! uncommitted session leaves those changes where they are.

use std::ops::{Deref, DerefMut};

use crate::debug_invariants::DebugInvariants;
use crate::topology::mesh::EditMesh;

/// Exclusive edit access to an [`EditMesh`].
#[derive(Debug)]
pub struct EditSession<'m> {
    mesh: &'m mut EditMesh,
    start_epoch: u64,
    committed: bool,
}

impl<'m> EditSession<'m> {
    /// Opens a session on `mesh`.
    pub fn begin(mesh: &'m mut EditMesh) -> Self {
        let start_epoch = mesh.epoch();
        Self {
            mesh,
            start_epoch,
            committed: false,
        }
    }

    /// Whether any structural mutation happened since [`EditSession::begin`].
    pub fn is_structurally_modified(&self) -> bool {
        self.mesh.epoch() != self.start_epoch
    }

    /// Closes the session and returns the mesh's new revision.
    ///
    /// Incidence invariants are checked in debug builds and with the
    /// `strict-invariants` / `check-invariants` features.
    pub fn commit(mut self) -> u64 {
        self.mesh.debug_assert_invariants();
        self.committed = true;
        self.mesh.bump_revision()
    }
}

impl Deref for EditSession<'_> {
    type Target = EditMesh;

    fn deref(&self) -> &EditMesh {
        &*self.mesh
    }
}

impl DerefMut for EditSession<'_> {
    fn deref_mut(&mut self) -> &mut EditMesh {
        &mut *self.mesh
    }
}

impl Drop for EditSession<'_> {
    fn drop(&mut self) {
        if !self.committed && self.is_structurally_modified() {
            log::warn!(
                "edit session dropped without commit; {} structural edits stay applied",
                self.mesh.epoch() - self.start_epoch
            );
        }
    }
}
