//! Demo geometry: a four-vertex pyramid drawn as an indexed triangle list.

/// Vertex positions, three floats each, tightly packed.
pub const PYRAMID_VERTICES: [f32; 12] = [
    -1.0, -1.0, 0.0,
     0.0, -1.0, 1.0,
     1.0, -1.0, 0.0,
     0.0,  1.0, 0.0,
];

/// Four faces sharing the four vertices above.
pub const PYRAMID_INDICES: [u32; 12] = [
    0, 3, 1,
    1, 3, 2,
    2, 3, 0,
    0, 1, 2,
];
