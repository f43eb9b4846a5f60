/// Floats per vertex in every attribute stream (homogeneous `xyzw` / `rgba`).
pub const COMPONENTS: usize = 4;

/// Vertices in a cuboid: 6 faces, 2 triangles each.
pub const CUBOID_VERTICES: usize = 36;

const CUBOID_FLOATS: usize = CUBOID_VERTICES * COMPONENTS;

/// Unit cube faces: outward normal and corners, counter-clockwise seen from
/// outside.
const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    ([1.0, 0.0, 0.0], [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]]),
    ([-1.0, 0.0, 0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
    ([0.0, 1.0, 0.0], [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]]),
    ([0.0, -1.0, 0.0], [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
    ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
    ([0.0, 0.0, -1.0], [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]]),
];

/// Two triangles per quad face.
const QUAD_TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// Per-face brightness so faces stay distinguishable without lighting.
const FACE_SHADE: [f32; 6] = [0.8, 0.8, 1.0, 0.5, 0.9, 0.7];

/// Positions of an axis-aligned cuboid centered at the origin.
pub const fn cuboid_vertices(half_extents: [f32; 3]) -> [f32; CUBOID_FLOATS] {
    let mut out = [0.0; CUBOID_FLOATS];
    let mut face = 0;
    while face < FACES.len() {
        let corners = FACES[face].1;
        let mut v = 0;
        while v < QUAD_TRIANGLES.len() {
            let corner = corners[QUAD_TRIANGLES[v]];
            let i = (face * QUAD_TRIANGLES.len() + v) * COMPONENTS;
            out[i] = corner[0] * half_extents[0];
            out[i + 1] = corner[1] * half_extents[1];
            out[i + 2] = corner[2] * half_extents[2];
            out[i + 3] = 1.0;
            v += 1;
        }
        face += 1;
    }
    out
}

/// Opaque per-face shaded colors for a cuboid.
pub const fn cuboid_colors(rgb: [f32; 3]) -> [f32; CUBOID_FLOATS] {
    let mut out = [0.0; CUBOID_FLOATS];
    let mut face = 0;
    while face < FACES.len() {
        let shade = FACE_SHADE[face];
        let mut v = 0;
        while v < QUAD_TRIANGLES.len() {
            let i = (face * QUAD_TRIANGLES.len() + v) * COMPONENTS;
            out[i] = rgb[0] * shade;
            out[i + 1] = rgb[1] * shade;
            out[i + 2] = rgb[2] * shade;
            out[i + 3] = 1.0;
            v += 1;
        }
        face += 1;
    }
    out
}

/// Face normals of a cuboid, `w = 0`.
pub const fn cuboid_normals() -> [f32; CUBOID_FLOATS] {
    let mut out = [0.0; CUBOID_FLOATS];
    let mut face = 0;
    while face < FACES.len() {
        let normal = FACES[face].0;
        let mut v = 0;
        while v < QUAD_TRIANGLES.len() {
            let i = (face * QUAD_TRIANGLES.len() + v) * COMPONENTS;
            out[i] = normal[0];
            out[i + 1] = normal[1];
            out[i + 2] = normal[2];
            v += 1;
        }
        face += 1;
    }
    out
}

/// Shared normals for every cuboid model.
pub static CUBOID_NORMALS: [f32; CUBOID_FLOATS] = cuboid_normals();

/// Borrowed view of one variant's static attribute tables.
///
/// Invariant (checked at compile time by `new`): all three streams hold
/// `vertex_count * 4` floats.
#[derive(Debug)]
pub struct Geometry {
    vertices: &'static [f32],
    colors: &'static [f32],
    normals: &'static [f32],
}

impl Geometry {
    pub const fn new(
        vertices: &'static [f32],
        colors: &'static [f32],
        normals: &'static [f32],
    ) -> Self {
        assert!(!vertices.is_empty(), "geometry needs at least one vertex");
        assert!(vertices.len() % COMPONENTS == 0, "vertex stream is not xyzw");
        assert!(colors.len() == vertices.len(), "color stream length mismatch");
        assert!(normals.len() == vertices.len(), "normal stream length mismatch");
        Self { vertices, colors, normals }
    }

    pub fn vertex_count(&self) -> u32 {
        (self.vertices.len() / COMPONENTS) as u32
    }

    pub fn vertices(&self) -> &'static [f32] {
        self.vertices
    }

    pub fn colors(&self) -> &'static [f32] {
        self.colors
    }

    pub fn normals(&self) -> &'static [f32] {
        self.normals
    }
}
