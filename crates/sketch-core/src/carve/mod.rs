//! Carve predicates for [`Lattice::carve`](crate::lattice::Lattice::carve).
//!
//! Every predicate answers *keep*: `false` rejects the lattice cell and
//! leaves a cavity. [`CarvePattern`] bundles them into one serializable
//! enum so a sketch config can pick any of them.

pub mod index;
pub mod solids;
pub mod tubes;

use serde::{Deserialize, Serialize};

use crate::lattice::{KeepAll, Lattice, LatticePoint, ShapePredicate};

pub use index::{
    BoundaryRule, BoundaryShell, CentralGap, ColumnKind, ColumnPattern, IndexDiagonals,
    PeriodicGaps, StructuralBeams,
};
pub use solids::{
    BoxCavities, Cavity, HelixTunnel, QuadricShell, SolidSphere, SphereLattice, TriangularPrism,
};
pub use tubes::{DiagonalTubes, ParabolaBand, ParabolaSide};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CarvePattern {
    Full,
    Spheres(SphereLattice),
    Helix(HelixTunnel),
    Boxes(BoxCavities),
    Prism(TriangularPrism),
    DiagonalTubes(DiagonalTubes),
    IndexDiagonals(IndexDiagonals),
    Boundary(BoundaryShell),
    Parabola(ParabolaBand),
    PeriodicGaps(PeriodicGaps),
    Beams(StructuralBeams),
    Columns(ColumnPattern),
    CentralGap(CentralGap),
    Quadric(QuadricShell),
    Sphere(SolidSphere),
}

impl Default for CarvePattern {
    fn default() -> Self {
        CarvePattern::Boxes(BoxCavities::default())
    }
}

impl CarvePattern {
    fn predicate(&self) -> &dyn ShapePredicate {
        match self {
            CarvePattern::Full => &KeepAll,
            CarvePattern::Spheres(p) => p,
            CarvePattern::Helix(p) => p,
            CarvePattern::Boxes(p) => p,
            CarvePattern::Prism(p) => p,
            CarvePattern::DiagonalTubes(p) => p,
            CarvePattern::IndexDiagonals(p) => p,
            CarvePattern::Boundary(p) => p,
            CarvePattern::Parabola(p) => p,
            CarvePattern::PeriodicGaps(p) => p,
            CarvePattern::Beams(p) => p,
            CarvePattern::Columns(p) => p,
            CarvePattern::CentralGap(p) => p,
            CarvePattern::Quadric(p) => p,
            CarvePattern::Sphere(p) => p,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CarvePattern::Full => "full",
            CarvePattern::Spheres(_) => "spheres",
            CarvePattern::Helix(_) => "helix",
            CarvePattern::Boxes(_) => "boxes",
            CarvePattern::Prism(_) => "prism",
            CarvePattern::DiagonalTubes(_) => "diagonal-tubes",
            CarvePattern::IndexDiagonals(_) => "index-diagonals",
            CarvePattern::Boundary(_) => "boundary",
            CarvePattern::Parabola(_) => "parabola",
            CarvePattern::PeriodicGaps(_) => "periodic-gaps",
            CarvePattern::Beams(_) => "beams",
            CarvePattern::Columns(_) => "columns",
            CarvePattern::CentralGap(_) => "central-gap",
            CarvePattern::Quadric(_) => "quadric",
            CarvePattern::Sphere(_) => "sphere",
        }
    }
}

impl ShapePredicate for CarvePattern {
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool {
        self.predicate().keep(lattice, point)
    }
}
