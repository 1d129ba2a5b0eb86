//! Decompressing a packaged map into place
//!
//! The new map is written to a staged sibling file, synced, renamed over the
//! installed map, and only then is the version recorded. Any failure before
//! the version is recorded rolls the installed map back, so the map file and
//! the version record always describe the same dataset.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use flate2::read::MultiGzDecoder;
use tracing::{debug, info};

use crate::error::{Result, TacoError, fs as fs_error, resource as resource_error};
use crate::hash::HASH_PREFIX;
use crate::prefs::{MAP_VERSION_KEY, PreferenceStore};
use crate::resource::{MapVersion, ResourceName};
use crate::transaction::InstallTransaction;

/// Size of the copy chunks; cancellation is checked between chunks
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Observer of extraction progress
pub trait ExtractProgress {
    /// Called after every chunk with the compressed bytes consumed so far
    fn on_decompress(&self, consumed: u64, total: Option<u64>);

    /// Called once the new map is installed and recorded
    fn on_finish(&self) {}
}

/// Optional knobs for [`extract`]
#[derive(Default, Clone, Copy)]
pub struct ExtractOptions<'a> {
    /// Cooperative cancellation flag, checked between chunks
    pub cancel: Option<&'a AtomicBool>,

    /// Progress observer
    pub progress: Option<&'a dyn ExtractProgress>,

    /// Compressed size of the resource, for percentage reporting
    pub compressed_len: Option<u64>,
}

/// Result of a successful extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    /// Version now recorded as installed
    pub version: MapVersion,

    /// Installed map path
    pub path: PathBuf,

    /// Decompressed size in bytes
    pub bytes_written: u64,

    /// BLAKE3 digest of the installed map
    pub digest: String,
}

/// Reader wrapper remembering whether the underlying source failed, so that
/// decoder errors can be told apart from I/O errors
struct SourceReader<R> {
    inner: R,
    consumed: u64,
    source_error: Option<String>,
}

impl<R: Read> Read for SourceReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf) {
            Ok(n) => {
                self.consumed += n as u64;
                Ok(n)
            }
            Err(e) => {
                if e.kind() != io::ErrorKind::Interrupted {
                    self.source_error = Some(e.to_string());
                }
                Err(e)
            }
        }
    }
}

/// Destination of the decompressed map, made durable before promotion
trait StagedWrite: Write {
    fn sync(&mut self) -> io::Result<()>;
}

impl StagedWrite for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

fn is_cancelled(options: &ExtractOptions<'_>) -> bool {
    options
        .cancel
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

/// Decompress `resource` into `out` chunk by chunk
///
/// Returns the decompressed byte count and the BLAKE3 digest.
fn copy_decompressed<R: Read, W: Write>(
    resource: R,
    out: &mut W,
    label: &str,
    out_path: &Path,
    options: &ExtractOptions<'_>,
) -> Result<(u64, String)> {
    let mut decoder = MultiGzDecoder::new(SourceReader {
        inner: resource,
        consumed: 0,
        source_error: None,
    });
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut written = 0u64;

    loop {
        if is_cancelled(options) {
            return Err(TacoError::Cancelled);
        }

        let bytes_read = match decoder.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(match &decoder.get_ref().source_error {
                    Some(reason) => fs_error::read_failed(label, reason),
                    None => resource_error::decompression_failed(label, e),
                });
            }
        };

        out.write_all(&buffer[..bytes_read])
            .map_err(|e| fs_error::write_failed(out_path, e))?;
        hasher.update(&buffer[..bytes_read]);
        written += bytes_read as u64;

        if let Some(progress) = options.progress {
            progress.on_decompress(decoder.get_ref().consumed, options.compressed_len);
        }
    }

    out.flush().map_err(|e| fs_error::write_failed(out_path, e))?;

    // The decoder has now read the source to its end
    if let Some(progress) = options.progress {
        progress.on_decompress(decoder.get_ref().consumed, options.compressed_len);
    }

    Ok((written, format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex())))
}

/// Decompress a packaged map to `target` and record `version` in `prefs`
///
/// Errors:
/// - [`TacoError::Decompression`] when the stream is not valid gzip
/// - [`TacoError::FileReadFailed`] when reading the resource fails
/// - [`TacoError::FileWriteFailed`] / [`TacoError::PreferencesWriteFailed`]
///   when writing the map or the version record fails
/// - [`TacoError::Cancelled`] when the cancellation flag is raised
///
/// In every error case the installed map and the recorded version are left
/// as they were.
pub fn extract<R: Read>(
    resource: R,
    target: &Path,
    version: MapVersion,
    prefs: &mut dyn PreferenceStore,
    options: ExtractOptions<'_>,
) -> Result<ExtractReport> {
    install_with(
        resource,
        target,
        version,
        prefs,
        options,
        InstallTransaction::create_staged,
    )
}

fn install_with<R: Read, W: StagedWrite>(
    resource: R,
    target: &Path,
    version: MapVersion,
    prefs: &mut dyn PreferenceStore,
    options: ExtractOptions<'_>,
    create_staged: impl FnOnce(&InstallTransaction) -> Result<W>,
) -> Result<ExtractReport> {
    let label = ResourceName::for_version(version).to_string();

    if is_cancelled(&options) {
        return Err(TacoError::Cancelled);
    }

    let mut transaction = InstallTransaction::begin(target)?;
    let staged = transaction.staged_path().to_path_buf();

    info!(resource = %label, target = %target.display(), "decompressing map");

    let mut out = create_staged(&transaction)?;
    let (bytes_written, digest) =
        copy_decompressed(resource, &mut out, &label, &staged, &options)?;
    out.sync()
        .map_err(|e| fs_error::write_failed(&staged, e))?;
    drop(out);

    debug!(bytes = bytes_written, staged = %staged.display(), "staged map written");

    transaction.promote()?;
    prefs.put_int(MAP_VERSION_KEY, version.get())?;
    transaction.commit();

    if let Some(progress) = options.progress {
        progress.on_finish();
    }

    info!(%version, bytes = bytes_written, %digest, "map installed");

    Ok(ExtractReport {
        version,
        path: target.to_path_buf(),
        bytes_written,
        digest,
    })
}
