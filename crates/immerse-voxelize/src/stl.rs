//! STL reading (binary and ASCII).

use std::path::Path;

use crate::error::{Result, VoxelizeError};
use crate::mesh::TriangleMesh;

const HEADER_LEN: usize = 80;
const RECORD_LEN: usize = 50;

/// Read an STL file from disk.
pub fn read_stl(path: impl AsRef<Path>) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let mesh = parse_stl(&bytes)?;
    log::debug!(
        "read {} triangles from {}",
        mesh.num_triangles(),
        path.display()
    );
    Ok(mesh)
}

/// Parse STL data, detecting binary or ASCII encoding.
///
/// A buffer is binary when its length matches the triangle count in its
/// header, even if the header happens to start with `solid`.
pub fn parse_stl(bytes: &[u8]) -> Result<TriangleMesh> {
    let mesh = if binary_triangle_count(bytes).is_some() {
        parse_binary(bytes)?
    } else if bytes.trim_ascii_start().starts_with(b"solid") {
        parse_ascii(bytes)?
    } else {
        return Err(VoxelizeError::Parse(format!(
            "{} bytes is neither a binary nor an ASCII STL",
            bytes.len()
        )));
    };

    if mesh.num_triangles() == 0 {
        return Err(VoxelizeError::EmptyMesh);
    }
    Ok(mesh)
}

fn binary_triangle_count(bytes: &[u8]) -> Option<usize> {
    let count_bytes = bytes.get(HEADER_LEN..HEADER_LEN + 4)?;
    let count = u32::from_le_bytes(count_bytes.try_into().ok()?) as usize;
    let expected = count.checked_mul(RECORD_LEN)?.checked_add(HEADER_LEN + 4)?;
    (bytes.len() == expected).then_some(count)
}

fn parse_binary(bytes: &[u8]) -> Result<TriangleMesh> {
    let count = binary_triangle_count(bytes)
        .ok_or_else(|| VoxelizeError::Parse("binary STL length does not match header".into()))?;

    let mut mesh = TriangleMesh::new();
    mesh.vertices.reserve(count * 9);
    mesh.indices.reserve(count * 3);

    for record in bytes[HEADER_LEN + 4..].chunks_exact(RECORD_LEN) {
        // Skip the 12-byte facet normal; winding is not needed for filling.
        let mut corners = [[0.0f32; 3]; 3];
        for (v, corner) in corners.iter_mut().enumerate() {
            for (c, value) in corner.iter_mut().enumerate() {
                let at = 12 + (v * 3 + c) * 4;
                *value = f32::from_le_bytes([
                    record[at],
                    record[at + 1],
                    record[at + 2],
                    record[at + 3],
                ]);
            }
        }
        mesh.push_triangle(corners);
    }

    Ok(mesh)
}

fn parse_ascii(bytes: &[u8]) -> Result<TriangleMesh> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| VoxelizeError::Parse(format!("ASCII STL is not UTF-8: {e}")))?;

    let mut mesh = TriangleMesh::new();
    let mut pending: Vec<[f32; 3]> = Vec::with_capacity(3);
    let mut tokens = text.split_whitespace();

    while let Some(token) = tokens.next() {
        if token != "vertex" {
            continue;
        }
        let mut corner = [0.0f32; 3];
        for value in corner.iter_mut() {
            let raw = tokens.next().ok_or_else(|| {
                VoxelizeError::Parse("vertex with fewer than 3 coordinates".into())
            })?;
            *value = raw
                .parse()
                .map_err(|_| VoxelizeError::Parse(format!("invalid vertex coordinate '{raw}'")))?;
        }
        pending.push(corner);
        if pending.len() == 3 {
            mesh.push_triangle([pending[0], pending[1], pending[2]]);
            pending.clear();
        }
    }

    if !pending.is_empty() {
        return Err(VoxelizeError::Parse(format!(
            "facet with {} vertices",
            pending.len()
        )));
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
        let mut data = Vec::with_capacity(84 + triangles.len() * 50);
        let mut header = b"solid but actually binary".to_vec();
        header.resize(80, b' ');
        data.extend_from_slice(&header);
        data.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for tri in triangles {
            for _ in 0..3 {
                data.extend_from_slice(&0.0f32.to_le_bytes());
            }
            for v in tri {
                for c in v {
                    data.extend_from_slice(&c.to_le_bytes());
                }
            }
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        data
    }

    const TRIANGLES: [[[f32; 3]; 3]; 2] = [
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        [[0.0, 0.0, 1.5], [1.0, 0.0, 1.5], [0.0, -2.25, 1.5]],
    ];

    const ASCII: &str = "solid test
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 0 0 1.5
      vertex 1.0e0 0 1.5
      vertex 0 -2.25 1.5
    endloop
  endfacet
endsolid test
";

    #[test]
    fn test_binary() {
        let mesh = parse_stl(&binary_stl(&TRIANGLES)).unwrap();
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(&mesh.vertices[9..12], &[0.0, 0.0, 1.5]);
    }

    #[test]
    fn test_ascii_matches_binary() {
        let ascii = parse_stl(ASCII.as_bytes()).unwrap();
        let binary = parse_stl(&binary_stl(&TRIANGLES)).unwrap();
        assert_eq!(ascii, binary);
    }

    #[test]
    fn test_empty_binary_is_rejected() {
        let err = parse_stl(&binary_stl(&[])).unwrap_err();
        assert!(matches!(err, VoxelizeError::EmptyMesh));
    }

    #[test]
    fn test_truncated_binary_is_rejected() {
        let mut data = binary_stl(&TRIANGLES);
        data.truncate(data.len() - 10);
        data[0] = b'x';
        assert!(matches!(parse_stl(&data), Err(VoxelizeError::Parse(_))));
    }

    #[test]
    fn test_bad_ascii_coordinate() {
        let text = "solid bad\nfacet\nouter loop\nvertex 0 0 zero\n";
        assert!(matches!(parse_stl(text.as_bytes()), Err(VoxelizeError::Parse(_))));
    }

    #[test]
    fn test_incomplete_ascii_facet() {
        let text = "solid bad\nvertex 0 0 0\nvertex 1 0 0\nendsolid\n";
        assert!(matches!(parse_stl(text.as_bytes()), Err(VoxelizeError::Parse(_))));
    }
}
