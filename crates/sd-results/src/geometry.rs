//! Grid geometry derived from a field header and the run parameters.

use std::f64::consts::PI;
use std::rc::Rc;

use ndarray::{Array1, Array3};
use sd_core::Real;
use sd_project::DomainShape;

use crate::types::FieldHeader;

/// Coordinate frame of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Cartesian,
    /// (θ, φ, r) for curvilinear grids.
    Native,
}

/// Grid axis. Curvilinear names alias the Cartesian axis at the same slot:
/// `Theta ~ X`, `Phi ~ Y`, `R ~ Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    Theta,
    Phi,
    R,
    /// Grid block, 2 on yin-yang grids. Has no coordinate nor mesh.
    Block,
}

impl Axis {
    fn slot(self) -> usize {
        match self {
            Axis::X | Axis::Theta => 0,
            Axis::Y | Axis::Phi => 1,
            Axis::Z | Axis::R => 2,
            Axis::Block => 3,
        }
    }

    /// Frame in which this axis name addresses a mesh.
    pub fn frame(self) -> Option<Frame> {
        match self {
            Axis::X | Axis::Y | Axis::Z => Some(Frame::Cartesian),
            Axis::Theta | Axis::Phi | Axis::R => Some(Frame::Native),
            Axis::Block => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ShapeFlags {
    cylindrical: bool,
    spherical: bool,
    axisymmetric: bool,
}

/// Resolved grid description. Read-only once built.
#[derive(Debug, Clone)]
pub struct Geometry {
    header: Rc<FieldHeader>,
    rcmb: Option<Real>,
    flags: ShapeFlags,
    ntot: [usize; 4],
    coords: [Array1<Real>; 3],
    cartesian_meshes: [Array3<Real>; 3],
    native_meshes: Option<[Array3<Real>; 3]>,
}

impl Geometry {
    /// Classify the grid and build coordinates and meshes.
    ///
    /// A header declaring a non-negative `rcmb` is curvilinear. A header
    /// without `rcmb` falls back on the configured `r_cmb` and shape.
    pub fn resolve(header: Rc<FieldHeader>, shape: DomainShape, r_cmb: Option<Real>) -> Self {
        let ntot = [header.nts[0], header.nts[1], header.nts[2], header.ntb];
        let twod_xz = ntot[1] == 1;

        let mut flags = ShapeFlags::default();
        let rcmb = match header.rcmb {
            Some(rcmb) => {
                if rcmb >= 0.0 {
                    flags.cylindrical =
                        twod_xz && (shape == DomainShape::Cylindrical || header.aspect[0] >= PI);
                    flags.spherical = !flags.cylindrical;
                }
                Some(rcmb)
            }
            None => {
                if let Some(rcmb) = r_cmb
                    && rcmb >= 0.0
                {
                    if twod_xz && shape == DomainShape::Cylindrical {
                        flags.cylindrical = true;
                    } else if shape == DomainShape::Spherical {
                        flags.spherical = true;
                    }
                }
                r_cmb
            }
        };
        flags.axisymmetric = !(flags.cylindrical || flags.spherical)
            && twod_xz
            && shape == DomainShape::Axisymmetric;

        let coords = [
            Array1::from(header.e1_coord.clone()),
            Array1::from(header.e2_coord.clone()),
            Array1::from(header.e3_coord.clone()),
        ];

        let (cartesian_meshes, native_meshes) = if flags.cylindrical || flags.spherical {
            let (cart, native) = curvilinear_meshes(&coords, rcmb.unwrap_or(0.0));
            (cart, Some(native))
        } else {
            (
                [
                    mesh_along(&coords, 0, |v| v),
                    mesh_along(&coords, 1, |v| v),
                    mesh_along(&coords, 2, |v| v),
                ],
                None,
            )
        };

        Self {
            header,
            rcmb,
            flags,
            ntot,
            coords,
            cartesian_meshes,
            native_meshes,
        }
    }

    pub fn header(&self) -> &FieldHeader {
        &self.header
    }

    /// Inner boundary radius after falling back on the run parameters.
    pub fn rcmb(&self) -> Option<Real> {
        self.rcmb
    }

    pub fn cartesian(&self) -> bool {
        !self.curvilinear()
    }

    pub fn curvilinear(&self) -> bool {
        self.spherical() || self.cylindrical()
    }

    /// 2-D annulus.
    pub fn cylindrical(&self) -> bool {
        self.flags.cylindrical
    }

    pub fn spherical(&self) -> bool {
        self.flags.spherical
    }

    pub fn axisymmetric(&self) -> bool {
        self.flags.axisymmetric
    }

    /// Spherical shell made of two overlapping blocks.
    pub fn yinyang(&self) -> bool {
        self.spherical() && self.ntot[3] == 2
    }

    pub fn twod_xz(&self) -> bool {
        self.ntot[1] == 1
    }

    pub fn twod_yz(&self) -> bool {
        self.ntot[0] == 1
    }

    pub fn twod(&self) -> bool {
        self.twod_xz() || self.twod_yz()
    }

    pub fn threed(&self) -> bool {
        !self.twod()
    }

    /// Total number of cells along `axis`.
    pub fn ntot(&self, axis: Axis) -> usize {
        self.ntot[axis.slot()]
    }

    /// Cell-centre coordinates along `axis`, as stored in the header.
    pub fn coord(&self, axis: Axis) -> Option<&Array1<Real>> {
        self.coords.get(axis.slot())
    }

    /// Mesh of `axis` in the frame its name belongs to. Native meshes only
    /// exist for curvilinear grids.
    pub fn mesh(&self, axis: Axis) -> Option<&Array3<Real>> {
        match axis.frame()? {
            Frame::Cartesian => self.cartesian_meshes.get(axis.slot()),
            Frame::Native => self.native_meshes.as_ref()?.get(axis.slot()),
        }
    }
}

fn mesh_shape(coords: &[Array1<Real>; 3]) -> (usize, usize, usize) {
    (coords[0].len(), coords[1].len(), coords[2].len())
}

/// `ij`-indexed mesh repeating `coords[slot]` (mapped by `f`) along the other axes.
fn mesh_along(coords: &[Array1<Real>; 3], slot: usize, f: impl Fn(Real) -> Real) -> Array3<Real> {
    Array3::from_shape_fn(mesh_shape(coords), |(i, j, k)| {
        let idx = [i, j, k][slot];
        f(coords[slot][idx])
    })
}

/// (x, y, z) and (θ, φ, r) meshes with z along the polar axis, x at
/// θ = 90°, φ = 0 and y at θ = 90°, φ = 90°.
fn curvilinear_meshes(
    coords: &[Array1<Real>; 3],
    rcmb: Real,
) -> ([Array3<Real>; 3], [Array3<Real>; 3]) {
    let theta = mesh_along(coords, 0, |v| v);
    let phi = mesh_along(coords, 1, |v| v);
    let r = mesh_along(coords, 2, |v| v + rcmb);

    let shape = mesh_shape(coords);
    let x = Array3::from_shape_fn(shape, |idx| r[idx] * phi[idx].cos() * theta[idx].sin());
    let y = Array3::from_shape_fn(shape, |idx| r[idx] * phi[idx].sin() * theta[idx].sin());
    let z = Array3::from_shape_fn(shape, |idx| r[idx] * theta[idx].cos());

    ([x, y, z], [theta, phi, r])
}
