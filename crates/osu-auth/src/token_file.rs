//! Plain-text token file persistence
//!
//! Guest credentials store one line (the access token); user credentials
//! store two (access token, then refresh token). Writes go through a temp
//! file + rename so a crash never leaves a half-written token behind.

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Read a token file that must contain exactly `expected` lines.
///
/// Lines are returned trimmed. A missing file is `NotFound`; any other line
/// count is `TokenFileFormat`.
pub async fn read_tokens(path: &Path, expected: usize) -> Result<Vec<String>> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound(format!(
                "token file {} does not exist",
                path.display()
            )));
        }
        Err(e) => return Err(Error::Io(format!("reading token file: {e}"))),
    };

    let lines: Vec<String> = contents.lines().map(|l| l.trim().to_owned()).collect();
    if lines.len() != expected {
        return Err(Error::TokenFileFormat {
            expected,
            found: lines.len(),
        });
    }
    Ok(lines)
}

/// Write tokens one per line (no trailing newline), atomically, mode 0600.
pub async fn write_tokens(path: &Path, tokens: &[&str]) -> Result<()> {
    let contents = tokens.join("\n");

    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Io("token path has no file name".into()))?
        .to_string_lossy();
    let tmp_path = dir.join(format!(".{file_name}.tmp.{}", std::process::id()));

    tokio::fs::write(&tmp_path, contents.as_bytes())
        .await
        .map_err(|e| Error::Io(format!("writing temp token file: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&tmp_path, perms)
            .await
            .map_err(|e| Error::Io(format!("setting token file permissions: {e}")))?;
    }

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Error::Io(format!("renaming temp token file: {e}")))?;

    debug!(path = %path.display(), lines = tokens.len(), "persisted tokens");
    Ok(())
}
