//! Oriented bounding boxes, one per peer rank, indexed in rank order.
//!
//! The box carries the sending grid's mesh tag; the exchange protocol copies
//! that tag onto every point flattened from the matching peer. The dump
//! routine writes one box per call in the plain-text tagged-block format the
//! historical tooling reads; it is purely observational.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// An oriented bounding region: center, three unit axes, half-extents along
/// each axis. Consumed by the exchange protocol, never owned by it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obb {
    pub center: [f64; 3],
    pub axes: [[f64; 3]; 3],
    pub half: [f64; 3],
    /// Tag of the component grid this box bounds.
    pub mesh_tag: i32,
}

impl Obb {
    /// Axis-aligned box from lower/upper corners.
    pub fn axis_aligned(lo: [f64; 3], hi: [f64; 3], mesh_tag: i32) -> Self {
        let center = [
            0.5 * (lo[0] + hi[0]),
            0.5 * (lo[1] + hi[1]),
            0.5 * (lo[2] + hi[2]),
        ];
        let half = [
            0.5 * (hi[0] - lo[0]),
            0.5 * (hi[1] - lo[1]),
            0.5 * (hi[2] - lo[2]),
        ];
        Self {
            center,
            axes: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            half,
            mesh_tag,
        }
    }

    /// Whether `p` lies inside the box (boundary inclusive).
    pub fn contains(&self, p: [f64; 3]) -> bool {
        let d = [
            p[0] - self.center[0],
            p[1] - self.center[1],
            p[2] - self.center[2],
        ];
        (0..3).all(|k| {
            let along =
                d[0] * self.axes[k][0] + d[1] * self.axes[k][1] + d[2] * self.axes[k][2];
            along.abs() <= self.half[k]
        })
    }

    /// The eight corners, in the sign order `(−,−,−) … (+,+,+)` with the
    /// first axis varying fastest. Pairs with the hex connectivity record
    /// `1 2 4 3 5 6 8 7` in the dump format.
    pub fn corners(&self) -> [[f64; 3]; 8] {
        let mut out = [[0.0; 3]; 8];
        let mut n = 0;
        for l in 0..2 {
            let sl = (2 * l - 1) as f64;
            for k in 0..2 {
                let sk = (2 * k - 1) as f64;
                for j in 0..2 {
                    let sj = (2 * j - 1) as f64;
                    for m in 0..3 {
                        out[n][m] = self.center[m]
                            + sj * self.axes[0][m] * self.half[0]
                            + sk * self.axes[1][m] * self.half[1]
                            + sl * self.axes[2][m] * self.half[2];
                    }
                    n += 1;
                }
            }
        }
        out
    }
}

/// Dump one box to `dir/cbox#####.dat` (zero-padded `id`) as a tagged-block
/// text file: title, variables, one brick zone of eight corners, the fixed
/// connectivity record, then center / axes / extents. Returns the path
/// written.
pub fn write_obb(obb: &Obb, id: usize, dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(format!("cbox{id:05}.dat"));
    let mut f = std::fs::File::create(&path)?;
    writeln!(f, "TITLE =\"Box file\"")?;
    writeln!(f, "VARIABLES=\"X\",\"Y\",\"Z\"")?;
    writeln!(f, "ZONE T=\"VOL_MIXED\",N=8 E=1 ET=BRICK, F=FEPOINT")?;
    for corner in obb.corners() {
        writeln!(f, "{:.6} {:.6} {:.6}", corner[0], corner[1], corner[2])?;
    }
    writeln!(f, "1 2 4 3 5 6 8 7")?;
    writeln!(f, "{:e} {:e} {:e}", obb.center[0], obb.center[1], obb.center[2])?;
    for k in 0..3 {
        writeln!(f, "{:e} {:e} {:e}", obb.axes[0][k], obb.axes[1][k], obb.axes[2][k])?;
    }
    writeln!(f, "{:e} {:e} {:e}", obb.half[0], obb.half[1], obb.half[2])?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_aligned_contains_boundary() {
        let obb = Obb::axis_aligned([0.0, 0.0, 0.0], [1.0, 2.0, 3.0], 0);
        assert!(obb.contains([0.5, 1.0, 1.5]));
        assert!(obb.contains([0.0, 0.0, 0.0]));
        assert!(obb.contains([1.0, 2.0, 3.0]));
        assert!(!obb.contains([1.1, 1.0, 1.5]));
    }

    #[test]
    fn rotated_box_contains_uses_axes() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let obb = Obb {
            center: [0.0; 3],
            axes: [[s, s, 0.0], [-s, s, 0.0], [0.0, 0.0, 1.0]],
            half: [1.0, 0.1, 0.1],
            mesh_tag: 0,
        };
        // Along the long diagonal axis.
        assert!(obb.contains([0.6, 0.6, 0.0]));
        // Same distance along x alone falls outside the thin axis.
        assert!(!obb.contains([0.6, 0.0, 0.0]));
    }

    #[test]
    fn corners_span_the_box() {
        let obb = Obb::axis_aligned([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0], 0);
        let corners = obb.corners();
        assert_eq!(corners[0], [-1.0, -1.0, -1.0]);
        assert_eq!(corners[7], [1.0, 1.0, 1.0]);
        // First axis varies fastest.
        assert_eq!(corners[1], [1.0, -1.0, -1.0]);
    }

    #[test]
    fn write_obb_names_file_by_id() {
        let dir = std::env::temp_dir();
        let obb = Obb::axis_aligned([0.0; 3], [1.0; 3], 3);
        let path = write_obb(&obb, 42, &dir).unwrap();
        assert!(path.file_name().unwrap().to_str().unwrap() == "cbox00042.dat");
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("TITLE"));
        assert!(text.contains("1 2 4 3 5 6 8 7"));
        std::fs::remove_file(path).unwrap();
    }
}
