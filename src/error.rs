use thiserror::Error;

/// Top-level error type for navigation mesh loading and path finding.
#[derive(Debug, Error)]
pub enum NavMeshError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("unknown path finder algorithm id {0}")]
    InvalidAlgorithm(u32),

    #[error("scene transform is not invertible")]
    SingularTransform,
}

/// Errors in the binary layout of a navigation mesh blob.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("buffer of {len} bytes is smaller than the {expected}-byte header")]
    TruncatedHeader { len: u64, expected: u64 },

    #[error("bad checksum {0:#010x}, expected \"NAVM\"")]
    BadChecksum(u32),

    #[error("unsupported format version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("{section} section ({count} records at offset {offset}) overruns the {len}-byte buffer")]
    SectionOutOfBounds {
        section: &'static str,
        offset: u64,
        count: u32,
        len: u64,
    },

    #[error("blob of {0} bytes does not fit in memory")]
    TooLarge(u64),
}

/// Errors in the vertex/edge/face topology of a navigation mesh.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("{kind} count {count} exceeds the index range (max {max})")]
    TooManyElements {
        kind: &'static str,
        count: usize,
        max: usize,
    },

    #[error("{kind} {index} references {target} {value}, but only {limit} exist")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        target: &'static str,
        value: usize,
        limit: usize,
    },

    #[error("face {face} side {side} uses edge {edge}, which does not join that side's corners")]
    MismatchedEdge {
        face: usize,
        side: usize,
        edge: usize,
    },

    #[error("triangle {0} is degenerate")]
    DegenerateFace(usize),

    #[error("edge between vertices {0} and {1} is shared by more than two faces")]
    NonManifoldEdge(usize, usize),

    #[error("gravity vector has zero length")]
    ZeroGravity,
}

/// Convenience type alias for results using [`NavMeshError`].
pub type Result<T> = std::result::Result<T, NavMeshError>;
