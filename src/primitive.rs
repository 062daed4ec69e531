use std::{fmt::Display, str::FromStr};

use glam::{Vec3, vec3};

use crate::{element::CH, error::Error, math::plane_normal, mesh::Mesh};

/// Coordinate axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    pub(crate) fn coord(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

/// The direction a new quad faces, such as `x+` or `z-`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Facing {
    pub axis: Axis,
    pub sign: Sign,
}

impl Facing {
    pub const fn new(axis: Axis, sign: Sign) -> Self {
        Facing { axis, sign }
    }
}

impl FromStr for Facing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(axis), Some(sign), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(Error::InvalidFacing(s.to_string()));
        };
        let axis = match axis {
            'x' => Axis::X,
            'y' => Axis::Y,
            'z' => Axis::Z,
            _ => return Err(Error::InvalidFacing(s.to_string())),
        };
        let sign = match sign {
            '+' => Sign::Positive,
            '-' => Sign::Negative,
            _ => return Err(Error::InvalidFacing(s.to_string())),
        };
        Ok(Facing { axis, sign })
    }
}

impl Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let axis = match self.axis {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        };
        let sign = match self.sign {
            Sign::Positive => '+',
            Sign::Negative => '-',
        };
        write!(f, "{axis}{sign}")
    }
}

/// Options for creating a single quad.
///
/// Explicit `positions` take priority over everything else and are used as
/// given. Otherwise the quad is centred at the origin, spans `width` by
/// `height` and faces along `facing`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadOptions {
    pub positions: Option<[Vec3; 4]>,
    pub width: f32,
    pub height: f32,
    pub facing: Facing,
}

impl Default for QuadOptions {
    fn default() -> Self {
        Self {
            positions: None,
            width: 1.0,
            height: 1.0,
            facing: Facing::default(),
        }
    }
}

impl QuadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_positions(mut self, positions: [Vec3; 4]) -> Self {
        self.positions = Some(positions);
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    /// Corners of the quad, before any flipping for negative facings.
    fn corners(&self) -> [Vec3; 4] {
        if let Some(positions) = self.positions {
            return positions;
        }
        let w = self.width * 0.5;
        let h = self.height * 0.5;
        match self.facing.axis {
            Axis::X => [
                vec3(0.0, -w, -h),
                vec3(0.0, w, -h),
                vec3(0.0, w, h),
                vec3(0.0, -w, h),
            ],
            Axis::Y => [
                vec3(-w, 0.0, -h),
                vec3(-w, 0.0, h),
                vec3(w, 0.0, h),
                vec3(w, 0.0, -h),
            ],
            Axis::Z => [
                vec3(w, -h, 0.0),
                vec3(w, h, 0.0),
                vec3(-w, h, 0.0),
                vec3(-w, -h, 0.0),
            ],
        }
    }
}

impl Mesh {
    /// Create a new mesh with a single quad. See [`QuadOptions`].
    pub fn quad(opts: &QuadOptions) -> Result<(Self, CH), Error> {
        let mut mesh = Self::with_capacity(4, 1);
        let c = mesh.add_quad(opts)?;
        Ok((mesh, c))
    }

    /// Append a quad with four new positions to this mesh. All four normals
    /// are set to the face normal.
    pub fn add_quad(&mut self, opts: &QuadOptions) -> Result<CH, Error> {
        let corners = opts.corners();
        let normal = plane_normal(corners[0], corners[1], corners[2]);
        let indices = corners.map(|pos| self.add_position(pos, normal));
        let c = self.push_cell(indices);
        if opts.positions.is_none() && opts.facing.sign == Sign::Negative {
            self.flip(c)?;
        }
        Ok(c)
    }

    /// Create a box centred at the origin, whose six sides do not share any
    /// positions. See [`Mesh::add_box_disjoint`].
    pub fn box_disjoint(x: f32, y: f32, z: f32) -> Result<(Self, [CH; 6]), Error> {
        let mut mesh = Self::with_capacity(24, 6);
        let cells = mesh.add_box_disjoint(x, y, z)?;
        Ok((mesh, cells))
    }

    /// Append a box of size `x` by `y` by `z` centred at the origin, with 24
    /// new positions. The returned cells are the top, the bottom, and then
    /// the four sides.
    pub fn add_box_disjoint(&mut self, x: f32, y: f32, z: f32) -> Result<[CH; 6], Error> {
        let top = self.add_quad(&QuadOptions::new().with_size(x, z))?;
        let offset = vec3(0.0, -y * 0.5, 0.0);
        for p in self.cell(top)? {
            self.positions_mut()[p.slot()] += offset;
        }
        let bottom = self.clone_cell(top)?;
        self.flip(bottom)?;
        let sides = self.extrude_disjoint(top, 0.0, y)?;
        Ok([
            top,
            bottom,
            sides.ring[0],
            sides.ring[1],
            sides.ring[2],
            sides.ring[3],
        ])
    }

    /// Makes a box centred at the origin, with the following topology.
    ///
    ///  ```text
    ///       4-----------7
    ///      /|          /|
    ///     / |         / |
    ///    5-----------6  |
    ///    |  |        |  |
    ///    |  0--------|--3
    ///    | /         | /
    ///    |/          |/
    ///    1-----------2
    ///  ```
    pub fn quad_box(x: f32, y: f32, z: f32) -> Result<(Self, [CH; 6]), Error> {
        let mut mesh = Self::with_capacity(24, 6);
        let cells = mesh.add_box(x, y, z)?;
        Ok((mesh, cells))
    }

    /// Append a box whose sides share their corners. This creates a disjoint
    /// box and merges all coincident positions of the mesh, so coincident
    /// positions that were already in the mesh are merged too.
    pub fn add_box(&mut self, x: f32, y: f32, z: f32) -> Result<[CH; 6], Error> {
        let cells = self.add_box_disjoint(x, y, z)?;
        self.merge_positions()?;
        Ok(cells)
    }
}

#[cfg(test)]
mod test {
    use glam::{Vec3, vec3};

    use super::{Axis, Facing, QuadOptions, Sign};
    use crate::{element::PH, error::Error, macros::assert_vec3_eq, mesh::Mesh};

    fn indices(raw: [u32; 4]) -> [PH; 4] {
        raw.map(PH::from)
    }

    #[test]
    fn t_parse_facing() {
        assert_eq!(
            "x-".parse::<Facing>().expect("Cannot parse facing"),
            Facing::new(Axis::X, Sign::Negative)
        );
        assert_eq!(
            "z+".parse::<Facing>().expect("Cannot parse facing"),
            Facing::new(Axis::Z, Sign::Positive)
        );
        for bad in ["w+", "x*", "x", "", "y+-"] {
            assert!(matches!(bad.parse::<Facing>(), Err(Error::InvalidFacing(_))));
        }
        assert_eq!(Facing::default().to_string(), "y+");
    }

    #[test]
    fn t_default_quad() {
        let (quad, c) = Mesh::quad(&QuadOptions::default()).expect("Cannot create quad");
        assert_eq!(quad.cell(c).expect("Cannot read cell"), indices([0, 1, 2, 3]));
        assert_eq!(
            quad.positions(),
            &[
                vec3(-0.5, 0.0, -0.5),
                vec3(-0.5, 0.0, 0.5),
                vec3(0.5, 0.0, 0.5),
                vec3(0.5, 0.0, -0.5),
            ]
        );
        assert_eq!(quad.normals(), &[vec3(0.0, 1.0, 0.0); 4]);
    }

    #[test]
    fn t_quad_facing_negative_z() {
        let opts = QuadOptions::new()
            .with_size(2.0, 6.0)
            .with_facing("z-".parse().expect("Cannot parse facing"));
        let (quad, c) = Mesh::quad(&opts).expect("Cannot create quad");
        assert_eq!(
            quad.positions(),
            &[
                vec3(1.0, -3.0, 0.0),
                vec3(1.0, 3.0, 0.0),
                vec3(-1.0, 3.0, 0.0),
                vec3(-1.0, -3.0, 0.0),
            ]
        );
        assert_eq!(quad.normals(), &[vec3(0.0, 0.0, -1.0); 4]);
        assert_eq!(quad.cell(c).expect("Cannot read cell"), indices([3, 2, 1, 0]));
        assert_eq!(
            quad.calc_cell_normal(c).expect("Cannot compute normal"),
            vec3(0.0, 0.0, -1.0)
        );
    }

    #[test]
    fn t_quad_facings_match_normals() {
        for s in ["x+", "x-", "y+", "y-", "z+", "z-"] {
            let facing: Facing = s.parse().expect("Cannot parse facing");
            let (quad, c) =
                Mesh::quad(&QuadOptions::new().with_facing(facing)).expect("Cannot create quad");
            let mut expected = Vec3::ZERO;
            expected[facing.axis.coord()] = match facing.sign {
                Sign::Positive => 1.0,
                Sign::Negative => -1.0,
            };
            assert_eq!(
                quad.calc_cell_normal(c).expect("Cannot compute normal"),
                expected
            );
            assert_eq!(quad.normals(), &[expected; 4]);
        }
    }

    #[test]
    fn t_explicit_positions_not_flipped() {
        let corners = [
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, 1.0),
            vec3(1.0, 0.0, 1.0),
            vec3(1.0, 0.0, 0.0),
        ];
        let opts = QuadOptions::new()
            .with_positions(corners)
            .with_facing(Facing::new(Axis::Y, Sign::Negative));
        let (quad, c) = Mesh::quad(&opts).expect("Cannot create quad");
        assert_eq!(quad.positions(), &corners);
        assert_eq!(quad.cell(c).expect("Cannot read cell"), indices([0, 1, 2, 3]));
        assert_eq!(quad.normals(), &[vec3(0.0, 1.0, 0.0); 4]);
    }

    #[test]
    fn t_add_quad_to_existing() {
        let (mut mesh, first) = Mesh::quad(&QuadOptions::default()).expect("Cannot create quad");
        let second = mesh
            .add_quad(&QuadOptions::new().with_facing(Facing::new(Axis::X, Sign::Positive)))
            .expect("Cannot add quad");
        assert_ne!(first, second);
        assert_eq!(mesh.num_positions(), 8);
        assert_eq!(
            mesh.cell(second).expect("Cannot read cell"),
            indices([4, 5, 6, 7])
        );
    }

    #[test]
    fn t_disjoint_box() {
        let (dbox, cells) = Mesh::box_disjoint(1.0, 2.0, 3.0).expect("Cannot create box");
        assert_eq!(dbox.num_positions(), 24);
        assert_eq!(dbox.num_cells(), 6);
        let mut seen = vec![false; 24];
        for c in cells {
            for p in dbox.cell(c).expect("Cannot read cell") {
                assert!(!std::mem::replace(&mut seen[p.slot()], true));
            }
        }
        // Flat shading: every position carries the normal of its cell.
        for c in cells {
            let n = dbox.calc_cell_normal(c).expect("Cannot compute normal");
            for p in dbox.cell(c).expect("Cannot read cell") {
                assert_vec3_eq!(dbox.normal(p).expect("Missing normal"), n);
            }
        }
        assert_eq!(
            dbox.calc_cell_normal(cells[0]).expect("Cannot compute normal"),
            vec3(0.0, 1.0, 0.0)
        );
        assert_eq!(
            dbox.calc_cell_normal(cells[1]).expect("Cannot compute normal"),
            vec3(0.0, -1.0, 0.0)
        );
    }

    #[test]
    fn t_merged_box() {
        let (qbox, cells) = Mesh::quad_box(1.0, 2.0, 3.0).expect("Cannot create box");
        assert_eq!(
            qbox.positions(),
            &[
                vec3(-0.5, -1.0, -1.5),
                vec3(-0.5, -1.0, 1.5),
                vec3(0.5, -1.0, 1.5),
                vec3(0.5, -1.0, -1.5),
                vec3(-0.5, 1.0, -1.5),
                vec3(-0.5, 1.0, 1.5),
                vec3(0.5, 1.0, 1.5),
                vec3(0.5, 1.0, -1.5),
            ]
        );
        assert_eq!(
            cells.map(|c| qbox.cell(c).expect("Cannot read cell")),
            [
                indices([4, 5, 6, 7]),
                indices([3, 2, 1, 0]),
                indices([0, 1, 5, 4]),
                indices([5, 1, 2, 6]),
                indices([7, 6, 2, 3]),
                indices([0, 4, 7, 3]),
            ]
        );
        for (pos, n) in qbox.positions().iter().zip(qbox.normals()) {
            let expected = vec3(pos.x.signum(), pos.y.signum(), pos.z.signum()) * 0.57735026;
            assert_vec3_eq!(*n, expected);
        }
    }

    #[test]
    fn t_merged_disjoint_box_matches_box() {
        let (mut dbox, _) = Mesh::box_disjoint(2.0, 2.0, 2.0).expect("Cannot create box");
        let merged = dbox.merge_positions().expect("Cannot merge positions");
        assert_eq!(merged, 16);
        let (qbox, _) = Mesh::quad_box(2.0, 2.0, 2.0).expect("Cannot create box");
        assert_eq!(dbox, qbox);
    }

    #[test]
    fn t_add_box_leaves_existing_geometry() {
        let (mut mesh, _) = Mesh::quad(
            &QuadOptions::new().with_positions([
                vec3(5.0, 5.0, 5.0),
                vec3(5.0, 5.0, 6.0),
                vec3(6.0, 5.0, 6.0),
                vec3(6.0, 5.0, 5.0),
            ]),
        )
        .expect("Cannot create quad");
        let before = mesh.positions().to_vec();
        mesh.add_box(1.0, 1.0, 1.0).expect("Cannot add box");
        assert_eq!(&mesh.positions()[..4], &before);
        assert_eq!(mesh.num_positions(), 12);
        assert_eq!(mesh.num_cells(), 7);
    }
}
