pub mod format;

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::error::{FormatError, Result};
use crate::navigation_mesh::NavigationMesh;

/// Entry points for creating a [`NavigationMesh`] from its binary form.
///
/// Every constructor validates the whole blob before returning a mesh; a
/// failure never yields a partially loaded mesh.
pub struct NavigationMeshFactory;

impl NavigationMeshFactory {
    /// Loads a mesh from a file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or read, or a format
    /// or topology error if its contents are not a valid mesh.
    pub fn create_from_file(path: impl AsRef<Path>) -> Result<NavigationMesh> {
        let path = path.as_ref();
        let file = File::open(path).inspect_err(|err| {
            debug!(path = %path.display(), %err, "cannot open navigation mesh file");
        })?;
        Self::create_from_reader(file)
    }

    /// Loads a mesh from a seekable stream.
    ///
    /// The stream length is found by seeking to its end; the whole stream is
    /// then read from the start.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if any seek, position query or read fails,
    /// [`FormatError::TooLarge`] if the stream does not fit in memory, or a
    /// format or topology error if its contents are not a valid mesh.
    pub fn create_from_reader<R: Read + Seek>(mut reader: R) -> Result<NavigationMesh> {
        let buffer = Self::read_all(&mut reader)?;
        Self::create_from_buffer(&buffer)
    }

    /// Parses a mesh from an in-memory blob.
    ///
    /// # Errors
    ///
    /// Returns a format or topology error if `bytes` is not a valid mesh.
    pub fn create_from_buffer(bytes: &[u8]) -> Result<NavigationMesh> {
        match format::decode(bytes) {
            Ok(mesh) => {
                debug!(
                    vertices = mesh.vertex_count(),
                    edges = mesh.edge_count(),
                    faces = mesh.face_count(),
                    "loaded navigation mesh"
                );
                Ok(mesh)
            }
            Err(err) => {
                debug!(len = bytes.len(), %err, "rejected navigation mesh blob");
                Err(err)
            }
        }
    }

    fn read_all<R: Read + Seek>(reader: &mut R) -> Result<Vec<u8>> {
        let read = |reader: &mut R| -> Result<Vec<u8>> {
            reader.seek(SeekFrom::End(0))?;
            let len = reader.stream_position()?;
            reader.seek(SeekFrom::Start(0))?;
            let len = usize::try_from(len).map_err(|_| FormatError::TooLarge(len))?;
            let mut buffer = vec![0; len];
            reader.read_exact(&mut buffer)?;
            Ok(buffer)
        };
        read(reader).inspect_err(|err| debug!(%err, "cannot read navigation mesh stream"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;
    use crate::error::NavMeshError;
    use crate::test_support::{init_tracing, jittered_grid, strip};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Fault {
        None,
        /// Fails the n-th call to `seek`, counting from zero.
        Seek(usize),
        Tell,
        ShortRead,
        ReadError,
    }

    /// Cursor that fails on demand.
    struct FaultyReader {
        inner: Cursor<Vec<u8>>,
        fault: Fault,
        seeks: usize,
        reads: usize,
    }

    impl FaultyReader {
        fn new(bytes: Vec<u8>, fault: Fault) -> Self {
            Self {
                inner: Cursor::new(bytes),
                fault,
                seeks: 0,
                reads: 0,
            }
        }
    }

    impl Read for FaultyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let call = self.reads;
            self.reads += 1;
            match self.fault {
                Fault::ReadError => Err(io::Error::other("injected read failure")),
                Fault::ShortRead if call > 0 => Ok(0),
                Fault::ShortRead => {
                    let n = buf.len().min(4);
                    self.inner.read(&mut buf[..n])
                }
                _ => self.inner.read(buf),
            }
        }
    }

    impl Seek for FaultyReader {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            let call = self.seeks;
            self.seeks += 1;
            if self.fault == Fault::Seek(call) {
                return Err(io::Error::other("injected seek failure"));
            }
            self.inner.seek(pos)
        }

        fn stream_position(&mut self) -> io::Result<u64> {
            if self.fault == Fault::Tell {
                return Err(io::Error::other("injected tell failure"));
            }
            self.inner.stream_position()
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("navmesh-{}-{name}.bin", std::process::id()))
    }

    #[test]
    fn missing_file_is_an_io_error() {
        init_tracing();
        let result = NavigationMeshFactory::create_from_file(temp_path("does-not-exist"));
        match result {
            Err(NavMeshError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::NotFound),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[test]
    fn loads_from_file() {
        init_tracing();
        let mesh = jittered_grid(5, 3, 11);
        let path = temp_path("loads-from-file");
        std::fs::write(&path, mesh.to_bytes()).unwrap();

        let loaded = NavigationMeshFactory::create_from_file(&path);
        std::fs::remove_file(&path).unwrap();
        let loaded = loaded.unwrap();

        assert_eq!(loaded.vertex_count(), mesh.vertex_count());
        assert_eq!(loaded.edge_count(), mesh.edge_count());
        assert_eq!(loaded.face_count(), mesh.face_count());
        assert_eq!(loaded.faces(), mesh.faces());
    }

    #[test]
    fn loading_twice_gives_equal_meshes() {
        let bytes = strip(3).to_bytes();
        let a = NavigationMeshFactory::create_from_buffer(&bytes).unwrap();
        let b = NavigationMeshFactory::create_from_buffer(&bytes).unwrap();
        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.edges(), b.edges());
        assert_eq!(a.faces(), b.faces());
        assert_eq!(a.gravity_vector(), b.gravity_vector());
    }

    #[test]
    fn reader_without_faults_loads() {
        let bytes = strip(2).to_bytes();
        let mut reader = FaultyReader::new(bytes, Fault::None);
        // Start away from zero to check the loader rewinds
        reader.inner.set_position(17);
        let mesh = NavigationMeshFactory::create_from_reader(reader).unwrap();
        assert_eq!(mesh.face_count(), 4);
    }

    #[test]
    fn every_stream_fault_is_reported() {
        init_tracing();
        let bytes = strip(2).to_bytes();
        for fault in [
            Fault::Seek(0),
            Fault::Tell,
            Fault::Seek(1),
            Fault::ShortRead,
            Fault::ReadError,
        ] {
            let reader = FaultyReader::new(bytes.clone(), fault);
            let result = NavigationMeshFactory::create_from_reader(reader);
            assert!(
                matches!(result, Err(NavMeshError::Io(_))),
                "{fault:?} was not reported"
            );
        }
    }

    #[test]
    fn short_read_is_unexpected_eof() {
        let reader = FaultyReader::new(strip(1).to_bytes(), Fault::ShortRead);
        match NavigationMeshFactory::create_from_reader(reader) {
            Err(NavMeshError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected UnexpectedEof, got {other:?}"),
        }
    }

    #[test]
    fn garbage_buffer_is_rejected() {
        init_tracing();
        assert!(NavigationMeshFactory::create_from_buffer(&[0xAB; 64]).is_err());
        assert!(NavigationMeshFactory::create_from_buffer(&[]).is_err());
    }
}
