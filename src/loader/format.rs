use std::io::{self, Cursor, Read};

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

use crate::error::{FormatError, Result};
use crate::math::{Point3, Vector3};
use crate::navigation_mesh::{Edge, Face, NavigationMesh, Vertex};

/// `"NAVM"` packed as a little-endian `u32`.
pub const CHECKSUM: u32 = u32::from_le_bytes(*b"NAVM");

/// Major format version this crate reads and writes.
pub const VERSION_MAJOR: u16 = 1;

/// Minor format version this crate writes.
pub const VERSION_MINOR: u16 = 0;

/// Size of the fixed header in bytes.
///
/// All fields are little-endian. The header is followed by three packed
/// record arrays whose positions it describes:
///
/// | offset | type       | field                                   |
/// |--------|------------|-----------------------------------------|
/// | 0      | `u32`      | checksum, ASCII `NAVM`                  |
/// | 4      | `u32`      | version, `major << 16 \| minor`         |
/// | 8      | `u32`      | data offset, from the start of the blob |
/// | 12     | `u32`      | vertex count                            |
/// | 16     | `u32`      | vertex offset, from the data offset     |
/// | 20     | `u32`      | edge count                              |
/// | 24     | `u32`      | edge offset, from the data offset       |
/// | 28     | `u32`      | face count                              |
/// | 32     | `u32`      | face offset, from the data offset       |
/// | 36     | `3 x f32`  | gravity                                 |
///
/// Records: a vertex is `3 x f32`; an edge is `2 x u16` vertices then
/// `2 x u16` faces; a face is `3 x u16` vertices, `3 x u16` edges,
/// `3 x f32` normal and `3 x f32` center.
pub const HEADER_SIZE: u32 = 48;

const VERTEX_RECORD_SIZE: u32 = 12;
const EDGE_RECORD_SIZE: u32 = 8;
const FACE_RECORD_SIZE: u32 = 36;

#[derive(Debug, Clone, PartialEq)]
struct Header {
    checksum: u32,
    version: u32,
    data_offset: u32,
    vertex_count: u32,
    vertex_offset: u32,
    edge_count: u32,
    edge_offset: u32,
    face_count: u32,
    face_offset: u32,
    gravity: Vector3,
}

impl Header {
    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            checksum: reader.read_u32::<LittleEndian>()?,
            version: reader.read_u32::<LittleEndian>()?,
            data_offset: reader.read_u32::<LittleEndian>()?,
            vertex_count: reader.read_u32::<LittleEndian>()?,
            vertex_offset: reader.read_u32::<LittleEndian>()?,
            edge_count: reader.read_u32::<LittleEndian>()?,
            edge_offset: reader.read_u32::<LittleEndian>()?,
            face_count: reader.read_u32::<LittleEndian>()?,
            face_offset: reader.read_u32::<LittleEndian>()?,
            gravity: read_vector(reader)?,
        })
    }

    fn version(&self) -> (u16, u16) {
        let [minor_lo, minor_hi, major_lo, major_hi] = self.version.to_le_bytes();
        (
            u16::from_le_bytes([major_lo, major_hi]),
            u16::from_le_bytes([minor_lo, minor_hi]),
        )
    }

    /// Absolute start of a record array, after checking it fits in `len` bytes.
    fn section(
        &self,
        section: &'static str,
        offset: u32,
        count: u32,
        record_size: u32,
        len: u64,
    ) -> std::result::Result<u64, FormatError> {
        let start = u64::from(self.data_offset) + u64::from(offset);
        let end = start + u64::from(count) * u64::from(record_size);
        if end > len {
            return Err(FormatError::SectionOutOfBounds {
                section,
                offset: start,
                count,
                len,
            });
        }
        Ok(start)
    }
}

/// Parses a navigation mesh blob.
///
/// Every header count and offset is checked against the buffer length before
/// any record is read, then every cross reference is checked by
/// [`NavigationMesh::from_parts`].
///
/// # Errors
///
/// Returns a [`FormatError`] for a malformed layout, or a topology error for
/// dangling indices and oversized arrays.
pub fn decode(bytes: &[u8]) -> Result<NavigationMesh> {
    let len = bytes.len() as u64;
    if len < u64::from(HEADER_SIZE) {
        return Err(FormatError::TruncatedHeader {
            len,
            expected: u64::from(HEADER_SIZE),
        }
        .into());
    }

    let mut cursor = Cursor::new(bytes);
    let header = Header::read_from(&mut cursor)?;
    if header.checksum != CHECKSUM {
        return Err(FormatError::BadChecksum(header.checksum).into());
    }
    let (major, minor) = header.version();
    if major != VERSION_MAJOR {
        return Err(FormatError::UnsupportedVersion { major, minor }.into());
    }

    let vertex_start = header.section(
        "vertex",
        header.vertex_offset,
        header.vertex_count,
        VERTEX_RECORD_SIZE,
        len,
    )?;
    let edge_start = header.section(
        "edge",
        header.edge_offset,
        header.edge_count,
        EDGE_RECORD_SIZE,
        len,
    )?;
    let face_start = header.section(
        "face",
        header.face_offset,
        header.face_count,
        FACE_RECORD_SIZE,
        len,
    )?;

    cursor.set_position(vertex_start);
    let vertices = (0..header.vertex_count)
        .map(|_| read_vertex(&mut cursor))
        .collect::<io::Result<Vec<_>>>()?;

    cursor.set_position(edge_start);
    let edges = (0..header.edge_count)
        .map(|_| read_edge(&mut cursor))
        .collect::<io::Result<Vec<_>>>()?;

    cursor.set_position(face_start);
    let faces = (0..header.face_count)
        .map(|_| read_face(&mut cursor))
        .collect::<io::Result<Vec<_>>>()?;

    NavigationMesh::from_parts(vertices, edges, faces, header.gravity)
}

/// Encodes a mesh so that [`decode`] reproduces it exactly.
#[must_use]
pub fn encode(mesh: &NavigationMesh) -> Vec<u8> {
    let vertex_bytes = mesh.vertex_count() * VERTEX_RECORD_SIZE;
    let edge_bytes = mesh.edge_count() * EDGE_RECORD_SIZE;
    let face_bytes = mesh.face_count() * FACE_RECORD_SIZE;

    let mut out = Encoder::with_capacity(HEADER_SIZE + vertex_bytes + edge_bytes + face_bytes);
    out.u32(CHECKSUM);
    out.u32((u32::from(VERSION_MAJOR) << 16) | u32::from(VERSION_MINOR));
    out.u32(HEADER_SIZE);
    out.u32(mesh.vertex_count());
    out.u32(0);
    out.u32(mesh.edge_count());
    out.u32(vertex_bytes);
    out.u32(mesh.face_count());
    out.u32(vertex_bytes + edge_bytes);
    out.vector(&mesh.gravity_vector());

    for vertex in mesh.vertices() {
        out.vector(&vertex.coordinates.coords);
    }
    for edge in mesh.edges() {
        edge.vertex.iter().chain(&edge.face).for_each(|&i| out.u16(i));
    }
    for face in mesh.faces() {
        face.vertex.iter().chain(&face.edge).for_each(|&i| out.u16(i));
        out.vector(&face.normal);
        out.vector(&face.center.coords);
    }
    out.bytes
}

fn read_vector<R: Read>(reader: &mut R) -> io::Result<Vector3> {
    Ok(Vector3::new(
        reader.read_f32::<LittleEndian>()?,
        reader.read_f32::<LittleEndian>()?,
        reader.read_f32::<LittleEndian>()?,
    ))
}

fn read_indices<R: Read, const N: usize>(reader: &mut R) -> io::Result<[u16; N]> {
    let mut indices = [0; N];
    reader.read_u16_into::<LittleEndian>(&mut indices)?;
    Ok(indices)
}

fn read_vertex<R: Read>(reader: &mut R) -> io::Result<Vertex> {
    Ok(Vertex {
        coordinates: Point3::from(read_vector(reader)?),
    })
}

fn read_edge<R: Read>(reader: &mut R) -> io::Result<Edge> {
    Ok(Edge {
        vertex: read_indices(reader)?,
        face: read_indices(reader)?,
    })
}

fn read_face<R: Read>(reader: &mut R) -> io::Result<Face> {
    Ok(Face {
        vertex: read_indices(reader)?,
        edge: read_indices(reader)?,
        normal: read_vector(reader)?,
        center: Point3::from(read_vector(reader)?),
    })
}

/// Infallible little-endian writer over a growing byte vector.
struct Encoder {
    bytes: Vec<u8>,
}

impl Encoder {
    fn with_capacity(capacity: u32) -> Self {
        Self {
            bytes: Vec::with_capacity(usize::try_from(capacity).unwrap_or_default()),
        }
    }

    fn u16(&mut self, value: u16) {
        let mut buf = [0; 2];
        LittleEndian::write_u16(&mut buf, value);
        self.bytes.extend_from_slice(&buf);
    }

    fn u32(&mut self, value: u32) {
        let mut buf = [0; 4];
        LittleEndian::write_u32(&mut buf, value);
        self.bytes.extend_from_slice(&buf);
    }

    fn f32(&mut self, value: f32) {
        let mut buf = [0; 4];
        LittleEndian::write_f32(&mut buf, value);
        self.bytes.extend_from_slice(&buf);
    }

    fn vector(&mut self, v: &Vector3) {
        self.f32(v.x);
        self.f32(v.y);
        self.f32(v.z);
    }
}
