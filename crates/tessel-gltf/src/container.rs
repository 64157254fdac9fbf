//! GLB assembly and file output.
//!
//! GLB layout (all integers little-endian `u32`):
//!
//! ```text
//! header   "glTF" | version = 2 | total length
//! chunk 0  length | "JSON" | compact JSON padded with spaces to 4 bytes
//! chunk 1  length | "BIN\0" | buffer bytes padded with zeros to 4 bytes
//! ```

use crate::buffer::align4;
use crate::document::Document;
use crate::encode::JsonLayout;
use crate::error::{GltfError, Result};

use base64::{engine::general_purpose::STANDARD, Engine};
use std::io::Write;
use std::path::{Path, PathBuf};

/// GLB magic "glTF".
pub const GLB_MAGIC: [u8; 4] = *b"glTF";
/// GLB container version.
pub const GLB_VERSION: u32 = 2;
/// JSON chunk type.
pub const CHUNK_JSON: [u8; 4] = *b"JSON";
/// Binary chunk type, "BIN" followed by a zero byte.
pub const CHUNK_BIN: [u8; 4] = *b"BIN\0";

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

impl Document {
    /// Assemble the document into a GLB byte stream.
    pub fn create_glb(&self) -> Result<Vec<u8>> {
        let mut json = self.to_json_string(None, JsonLayout::Compact)?.into_bytes();
        json.resize(align4(json.len()), b' ');
        let bin = self.buffer.padded();

        let total = HEADER_LEN + CHUNK_HEADER_LEN + json.len() + CHUNK_HEADER_LEN + bin.len();
        let total_u32 = u32::try_from(total).map_err(|_| GltfError::ContainerTooLarge(total))?;

        let mut glb = Vec::with_capacity(total);

        glb.extend_from_slice(&GLB_MAGIC);
        glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
        glb.extend_from_slice(&total_u32.to_le_bytes());

        // Both chunk lengths are below `total`, which fits in u32.
        glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_JSON);
        glb.extend_from_slice(&json);

        glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_BIN);
        glb.extend_from_slice(&bin);

        Ok(glb)
    }

    /// GLB byte stream as standard base64 text.
    pub fn to_base64(&self) -> Result<String> {
        Ok(STANDARD.encode(self.create_glb()?))
    }

    /// Write the document as a GLB file at `path`.
    pub fn save_glb(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let glb = self.create_glb()?;
        write_atomic(path, &glb)?;
        tracing::info!(path = %path.display(), bytes = glb.len(), "wrote glb");
        Ok(())
    }

    /// Write indented glTF JSON at `path` and the buffer beside it as
    /// `<stem>.bin`, referenced from the JSON by bare file name.
    ///
    /// Returns the path of the binary file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let (bin_name, bin_path) = bin_sibling(path)?;

        write_atomic(&bin_path, self.buffer.as_bytes())?;
        let json = self.to_json_string(Some(&bin_name), JsonLayout::Pretty)?;
        write_atomic(path, json.as_bytes())?;

        tracing::info!(
            path = %path.display(),
            bin = %bin_path.display(),
            json_bytes = json.len(),
            bin_bytes = self.buffer.len(),
            "wrote gltf"
        );
        Ok(bin_path)
    }
}

/// File name and full path of the `.bin` written next to `path`.
///
/// Fails when `path` itself ends in `.bin`, since the JSON would replace the
/// buffer it references.
fn bin_sibling(path: &Path) -> Result<(String, PathBuf)> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            GltfError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("no usable file name in {}", path.display()),
            ))
        })?;
    let name = format!("{stem}.bin");
    let bin_path = path.with_file_name(&name);
    if bin_path == path {
        return Err(GltfError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} would be overwritten by its own buffer", path.display()),
        )));
    }
    Ok((name, bin_path))
}

/// Write `data` to a temporary file in the target directory, then move it
/// over `path`. A failed write never leaves a truncated file at `path`.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| GltfError::Io(e.error))?;
    Ok(())
}
