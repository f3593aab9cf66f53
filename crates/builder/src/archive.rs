//! Orig tarball extraction

use async_compression::tokio::bufread::{BzDecoder, GzipDecoder};
use debforge_errors::{BuildError, Error};
use debforge_types::ArchiveCompression;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufReader};

/// Unpack a compressed tarball into `dest`, keeping its top-level directory
///
/// Files from an earlier extraction are overwritten.
///
/// # Errors
///
/// Returns `BuildError::ExtractionFailed` if the archive cannot be read,
/// decompressed or unpacked.
pub async fn extract_tarball(
    archive: &Path,
    compression: ArchiveCompression,
    dest: &Path,
) -> Result<(), Error> {
    let temp_dir = tempfile::tempdir().map_err(|e| BuildError::ExtractionFailed {
        message: format!("failed to create temp directory: {e}"),
    })?;
    let temp_path = temp_dir.path().join("archive.tar");

    decompress(archive, compression, &temp_path).await?;

    let dest = dest.to_path_buf();
    let result = tokio::task::spawn_blocking(move || -> Result<(), Error> {
        let tar = std::fs::File::open(&temp_path).map_err(|e| BuildError::ExtractionFailed {
            message: format!("failed to open decompressed file: {e}"),
        })?;
        let mut archive = tar::Archive::new(tar);
        archive.set_preserve_permissions(true);
        archive.set_overwrite(true);
        archive
            .unpack(&dest)
            .map_err(|e| BuildError::ExtractionFailed {
                message: format!("failed to unpack into {}: {e}", dest.display()),
            })?;
        Ok(())
    })
    .await
    .map_err(|e| BuildError::ExtractionFailed {
        message: format!("task join error: {e}"),
    })?;

    drop(temp_dir);
    result
}

async fn decompress(
    archive: &Path,
    compression: ArchiveCompression,
    output: &Path,
) -> Result<(), Error> {
    let input_file = File::open(archive)
        .await
        .map_err(|e| BuildError::ExtractionFailed {
            message: format!("failed to open {}: {e}", archive.display()),
        })?;
    let mut output_file = File::create(output)
        .await
        .map_err(|e| BuildError::ExtractionFailed {
            message: format!("failed to create temp file: {e}"),
        })?;
    let reader = BufReader::new(input_file);

    let copied = match compression {
        ArchiveCompression::Gzip => {
            let mut decoder = GzipDecoder::new(reader);
            tokio::io::copy(&mut decoder, &mut output_file).await
        }
        ArchiveCompression::Bzip2 => {
            let mut decoder = BzDecoder::new(reader);
            tokio::io::copy(&mut decoder, &mut output_file).await
        }
    };
    copied.map_err(|e| BuildError::ExtractionFailed {
        message: format!("failed to decompress {compression} archive: {e}"),
    })?;

    output_file
        .flush()
        .await
        .map_err(|e| BuildError::ExtractionFailed {
            message: format!("failed to flush temp file: {e}"),
        })?;
    Ok(())
}
