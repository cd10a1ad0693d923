//! Fixed exit-code taxonomy for invariant violations.
//!
//! These abort the process: they indicate a programming bug or a
//! catastrophic numerical failure, never a recoverable condition.
//! Recoverable conditions are reported through operation outcomes instead.

use std::process;

/// Every fatal condition maps to a stable process exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fatal {
    /// An edge starts at the same vertex it ends at.
    CircleEdge = 1,
    /// A vertex lies exactly on a polygon edge after a translation.
    VertexOnPolygonEdgeAtEnd = 2,
    /// The edge to be flipped at an event is a polygon edge.
    PolygonEdgeFlip = 3,
    /// A third triangle is assigned to an edge.
    TriangleOverflow = 4,
    /// Two triangles share all three edges, or a triangle repeats a vertex.
    DuplicateTriangle = 5,
    /// The moved vertex left its surrounding polygon undetected.
    SurroundingPolygonAtEnd = 6,
    /// The moving vertex lies on a polygon edge before the translation.
    VertexOnPolygonEdgeAtStart = 7,
    /// A vertex was deleted while still linked to edges or triangles.
    VertexStillLinked = 8,
    /// An inter-stage global integrity check failed.
    IntegrityCheck = 9,
    /// The surrounding-polygon check found a vertex exactly on a polygon edge.
    VertexOnPolygonEdgeInCheck = 10,
    /// The simplicity check found two intersecting polygon edges.
    NotSimple = 11,
    /// A vertex was inserted with an invalid ring id.
    InvalidRingId = 12,
    /// A configuration value has the wrong type.
    ConfigType = 13,
    /// Configuration values are missing or conflicting.
    ConfigValidation = 14,
    /// A region polygon for retriangulation was built inconsistently.
    PolygonBuild = 15,
    /// A star-shaped region was triangulated without a kernel point.
    StarWithoutKernel = 16,
    /// The selection tree lost track of an entry.
    SelectionTree = 17,
}

/// Write a diagnostic to stderr and abort with the code of `f`.
pub fn abort(f: Fatal, msg: &str) -> ! {
    eprintln!("fatal: {}", msg);
    process::exit(f as i32)
}

#[cfg(test)]
mod tests {
    use super::Fatal;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(Fatal::CircleEdge as i32, 1);
        assert_eq!(Fatal::SurroundingPolygonAtEnd as i32, 6);
        assert_eq!(Fatal::NotSimple as i32, 11);
        assert_eq!(Fatal::SelectionTree as i32, 17);
    }
}
