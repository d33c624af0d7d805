//! Generation-tagged handles for mesh elements.
//!
//! Every vertex, edge and face of an [`EditMesh`](crate::topology::mesh::EditMesh)
//! lives in a slot of an arena. A handle stores the slot index together with
//! the slot's generation at the time the element was inserted. Removing an
//! element bumps the slot generation, so every handle still pointing at the
//! slot becomes detectably stale instead of silently aliasing whatever is
//! inserted there next.
//!
//! This module provides:
//! - [`RawHandle`], the `(index, generation)` pair shared by all element kinds.
//! - [`VertexId`], [`EdgeId`] and [`FaceId`], zero-cost typed wrappers.
//! - `Debug`/`Display` as `VertexId(3v1)` / `3v1` so handles read well in logs.

use std::{fmt, num::NonZeroU32};

/// Slot index plus the generation the slot had when the element was created.
///
/// The generation is non-zero so `Option<RawHandle>` needs no extra space.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct RawHandle {
    pub(crate) index: u32,
    pub(crate) generation: NonZeroU32,
}

impl RawHandle {
    #[inline]
    pub(crate) const fn new(index: u32, generation: NonZeroU32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the owning arena.
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation.get()
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(pub(crate) RawHandle);

        impl $name {
            /// Element kind used in diagnostics.
            pub const KIND: &'static str = $kind;

            #[inline]
            pub(crate) const fn from_raw(raw: RawHandle) -> Self {
                Self(raw)
            }

            /// The untyped `(index, generation)` pair.
            #[inline]
            pub const fn raw(self) -> RawHandle {
                self.0
            }

            /// Slot index inside the owning arena.
            #[inline]
            pub const fn index(self) -> u32 {
                self.0.index()
            }

            /// Generation of the slot when this handle was issued.
            #[inline]
            pub const fn generation(self) -> u32 {
                self.0.generation()
            }

            /// Build the error reported when this handle is dereferenced after removal.
            pub fn stale(self) -> $crate::mesh_error::MeshFlattenError {
                $crate::mesh_error::MeshFlattenError::StaleHandle {
                    kind: Self::KIND,
                    handle: self.to_string(),
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

define_handle!(
    /// Handle to a vertex of an `EditMesh`.
    VertexId,
    "vertex"
);
define_handle!(
    /// Handle to an (unordered) edge of an `EditMesh`.
    EdgeId,
    "edge"
);
define_handle!(
    /// Handle to a polygon face of an `EditMesh`.
    FaceId,
    "face"
);

// Two `u32` words; the non-zero generation keeps `Option<handle>` the same size.
static_assertions::assert_eq_size!(RawHandle, u64);
static_assertions::assert_eq_size!(VertexId, u64);
static_assertions::assert_eq_size!(EdgeId, u64);
static_assertions::assert_eq_size!(FaceId, u64);
static_assertions::assert_eq_size!(Option<FaceId>, u64);
static_assertions::assert_eq_size!(Option<VertexId>, u64);
