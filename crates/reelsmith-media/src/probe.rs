//! Media duration probing via ffprobe.

use std::path::Path;

use tokio::process::Command;

use crate::error::{MediaError, Result};

/// Measure the duration of a media file in seconds.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MediaError::MissingTool("ffprobe".to_string())
            } else {
                MediaError::Io(e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(MediaError::Probe {
            path: path.display().to_string(),
            message: stderr,
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let duration: f64 = stdout.trim().parse().map_err(|_| MediaError::Probe {
        path: path.display().to_string(),
        message: format!("unparseable duration: {:?}", stdout.trim()),
    })?;

    if duration <= 0.0 {
        return Err(MediaError::Probe {
            path: path.display().to_string(),
            message: "zero-duration media".to_string(),
        });
    }

    Ok(duration)
}
