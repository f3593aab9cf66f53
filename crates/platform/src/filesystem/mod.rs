//! Filesystem operations for staging packaging files

use debforge_errors::Error;
use std::future::Future;
use std::io;
use std::path::Path;
use std::pin::Pin;
use tokio::fs;

/// Recursively copy a directory tree to a destination that must not exist
///
/// Fails with an `AlreadyExists` I/O error rather than merging into or
/// overwriting an existing tree. `src` is checked before `dst` is created,
/// and a partially copied `dst` is removed again on failure.
///
/// # Errors
///
/// Returns an `Io` error if `src` is missing or not a directory, if `dst`
/// exists, or if any entry cannot be copied.
pub async fn copy_directory_recursive(src: &Path, dst: &Path) -> Result<(), Error> {
    let metadata = fs::metadata(src)
        .await
        .map_err(|e| Error::io_with_path(&e, src))?;
    if !metadata.is_dir() {
        let err = io::Error::new(io::ErrorKind::NotADirectory, "not a directory");
        return Err(Error::io_with_path(&err, src));
    }

    fs::create_dir(dst)
        .await
        .map_err(|e| Error::io_with_path(&e, dst))?;

    let result = copy_tree(src, dst).await;
    if result.is_err() {
        let _ = fs::remove_dir_all(dst).await;
    }
    result
}

fn copy_tree<'a>(
    src: &'a Path,
    dst: &'a Path,
) -> Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'a>> {
    Box::pin(async move {
        let mut entries = fs::read_dir(src)
            .await
            .map_err(|e| Error::io_with_path(&e, src))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::io_with_path(&e, src))?
        {
            let entry_path = entry.path();
            let dst_path = dst.join(entry.file_name());

            if fs::metadata(&entry_path)
                .await
                .map_err(|e| Error::io_with_path(&e, &entry_path))?
                .is_dir()
            {
                fs::create_dir(&dst_path)
                    .await
                    .map_err(|e| Error::io_with_path(&e, &dst_path))?;
                copy_tree(&entry_path, &dst_path).await?;
            } else {
                fs::copy(&entry_path, &dst_path)
                    .await
                    .map_err(|e| Error::io_with_path(&e, &entry_path))?;
            }
        }

        Ok(())
    })
}
