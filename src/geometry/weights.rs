//! Nodal interpolation weights for donor cells.
//!
//! [`NodalWeightSolver`] is the seam the list builder consumes; the provided
//! [`IsoparametricSolver`] inverts the reference-element map with a Newton
//! iteration for tetrahedra, pyramids, prisms and hexahedra (4/5/6/8
//! vertices). Weights are returned exactly as evaluated at the converged
//! parametric point — a query point slightly outside the cell yields weights
//! outside `[0,1]`, which downstream stages report but tolerate.
//!
//! [`CellSampler`] is the collaborator surface the receptor classifier uses
//! to obtain interior sample points of a high-order receptor cell.

use crate::error::OversetError;
use crate::mesh::block::CellId;

/// Per-cell interior sample points for high-order receptor cells.
pub trait CellSampler {
    /// Number of solution points carried by the (1-based) cell.
    fn sample_count(&self, cell: CellId) -> usize;

    /// Append `count` sample points (3 reals each) for `cell` to `out`.
    fn sample_points(&self, cell: CellId, count: usize, out: &mut Vec<f64>);
}

/// Computes one weight per donor-cell vertex such that the weighted sum of
/// vertex values interpolates the field at the query point.
pub trait NodalWeightSolver {
    /// # Errors
    /// `UnsupportedCellShape` for vertex counts the solver does not know;
    /// `DegenerateDonorCell` if the cell's map is singular.
    fn nodal_weights(
        &self,
        verts: &[[f64; 3]],
        point: [f64; 3],
    ) -> Result<Vec<f64>, OversetError>;
}

/// Newton inversion of the isoparametric reference map on `[0,1]^3`-style
/// reference elements.
#[derive(Clone, Debug)]
pub struct IsoparametricSolver {
    pub max_iters: usize,
    pub tol: f64,
}

impl Default for IsoparametricSolver {
    fn default() -> Self {
        Self {
            max_iters: 40,
            tol: 1e-12,
        }
    }
}

/// Shape functions at parametric point `(u,v,w)`; vertex ordering is the
/// usual bottom-face-then-top-face convention.
fn shape(nvert: usize, p: [f64; 3]) -> [f64; 8] {
    let [u, v, w] = p;
    let mut n = [0.0; 8];
    match nvert {
        4 => {
            n[0] = 1.0 - u - v - w;
            n[1] = u;
            n[2] = v;
            n[3] = w;
        }
        5 => {
            n[0] = (1.0 - u) * (1.0 - v) * (1.0 - w);
            n[1] = u * (1.0 - v) * (1.0 - w);
            n[2] = u * v * (1.0 - w);
            n[3] = (1.0 - u) * v * (1.0 - w);
            n[4] = w;
        }
        6 => {
            n[0] = (1.0 - u - v) * (1.0 - w);
            n[1] = u * (1.0 - w);
            n[2] = v * (1.0 - w);
            n[3] = (1.0 - u - v) * w;
            n[4] = u * w;
            n[5] = v * w;
        }
        8 => {
            n[0] = (1.0 - u) * (1.0 - v) * (1.0 - w);
            n[1] = u * (1.0 - v) * (1.0 - w);
            n[2] = u * v * (1.0 - w);
            n[3] = (1.0 - u) * v * (1.0 - w);
            n[4] = (1.0 - u) * (1.0 - v) * w;
            n[5] = u * (1.0 - v) * w;
            n[6] = u * v * w;
            n[7] = (1.0 - u) * v * w;
        }
        _ => unreachable!("vertex count validated by caller"),
    }
    n
}

/// `d n_m / d(u,v,w)` at `p`.
fn shape_deriv(nvert: usize, p: [f64; 3]) -> [[f64; 3]; 8] {
    let [u, v, w] = p;
    let mut d = [[0.0; 3]; 8];
    match nvert {
        4 => {
            d[0] = [-1.0, -1.0, -1.0];
            d[1] = [1.0, 0.0, 0.0];
            d[2] = [0.0, 1.0, 0.0];
            d[3] = [0.0, 0.0, 1.0];
        }
        5 => {
            d[0] = [
                -(1.0 - v) * (1.0 - w),
                -(1.0 - u) * (1.0 - w),
                -(1.0 - u) * (1.0 - v),
            ];
            d[1] = [(1.0 - v) * (1.0 - w), -u * (1.0 - w), -u * (1.0 - v)];
            d[2] = [v * (1.0 - w), u * (1.0 - w), -u * v];
            d[3] = [-v * (1.0 - w), (1.0 - u) * (1.0 - w), -(1.0 - u) * v];
            d[4] = [0.0, 0.0, 1.0];
        }
        6 => {
            d[0] = [-(1.0 - w), -(1.0 - w), -(1.0 - u - v)];
            d[1] = [1.0 - w, 0.0, -u];
            d[2] = [0.0, 1.0 - w, -v];
            d[3] = [-w, -w, 1.0 - u - v];
            d[4] = [w, 0.0, u];
            d[5] = [0.0, w, v];
        }
        8 => {
            d[0] = [
                -(1.0 - v) * (1.0 - w),
                -(1.0 - u) * (1.0 - w),
                -(1.0 - u) * (1.0 - v),
            ];
            d[1] = [(1.0 - v) * (1.0 - w), -u * (1.0 - w), -u * (1.0 - v)];
            d[2] = [v * (1.0 - w), u * (1.0 - w), -u * v];
            d[3] = [-v * (1.0 - w), (1.0 - u) * (1.0 - w), -(1.0 - u) * v];
            d[4] = [-(1.0 - v) * w, -(1.0 - u) * w, (1.0 - u) * (1.0 - v)];
            d[5] = [(1.0 - v) * w, -u * w, u * (1.0 - v)];
            d[6] = [v * w, u * w, u * v];
            d[7] = [-v * w, (1.0 - u) * w, (1.0 - u) * v];
        }
        _ => unreachable!("vertex count validated by caller"),
    }
    d
}

impl NodalWeightSolver for IsoparametricSolver {
    fn nodal_weights(
        &self,
        verts: &[[f64; 3]],
        point: [f64; 3],
    ) -> Result<Vec<f64>, OversetError> {
        let nvert = verts.len();
        if !matches!(nvert, 4 | 5 | 6 | 8) {
            return Err(OversetError::UnsupportedCellShape(nvert));
        }
        let mut p = if nvert == 4 {
            [0.25, 0.25, 0.25]
        } else {
            [0.5, 0.5, 0.5]
        };
        let mut n = shape(nvert, p);
        for _ in 0..self.max_iters {
            // Residual of the forward map.
            let mut f = [-point[0], -point[1], -point[2]];
            for (m, xv) in verts.iter().enumerate() {
                for i in 0..3 {
                    f[i] += n[m] * xv[i];
                }
            }
            if f[0].abs() + f[1].abs() + f[2].abs() < self.tol {
                break;
            }
            let dn = shape_deriv(nvert, p);
            // J[i][j] = d x_i / d r_j
            let mut jac = [[0.0; 3]; 3];
            for (m, xv) in verts.iter().enumerate() {
                for i in 0..3 {
                    for j in 0..3 {
                        jac[i][j] += xv[i] * dn[m][j];
                    }
                }
            }
            let det = jac[0][0] * (jac[1][1] * jac[2][2] - jac[1][2] * jac[2][1])
                - jac[0][1] * (jac[1][0] * jac[2][2] - jac[1][2] * jac[2][0])
                + jac[0][2] * (jac[1][0] * jac[2][1] - jac[1][1] * jac[2][0]);
            if det.abs() < f64::EPSILON {
                return Err(OversetError::DegenerateDonorCell { det });
            }
            let inv = [
                [
                    (jac[1][1] * jac[2][2] - jac[1][2] * jac[2][1]) / det,
                    (jac[0][2] * jac[2][1] - jac[0][1] * jac[2][2]) / det,
                    (jac[0][1] * jac[1][2] - jac[0][2] * jac[1][1]) / det,
                ],
                [
                    (jac[1][2] * jac[2][0] - jac[1][0] * jac[2][2]) / det,
                    (jac[0][0] * jac[2][2] - jac[0][2] * jac[2][0]) / det,
                    (jac[0][2] * jac[1][0] - jac[0][0] * jac[1][2]) / det,
                ],
                [
                    (jac[1][0] * jac[2][1] - jac[1][1] * jac[2][0]) / det,
                    (jac[0][1] * jac[2][0] - jac[0][0] * jac[2][1]) / det,
                    (jac[0][0] * jac[1][1] - jac[0][1] * jac[1][0]) / det,
                ],
            ];
            for i in 0..3 {
                p[i] -= inv[i][0] * f[0] + inv[i][1] * f[1] + inv[i][2] * f[2];
            }
            n = shape(nvert, p);
        }
        Ok(n[..nvert].to_vec())
    }
}
