//! Clip download and ffmpeg execution.

use std::path::Path;
use std::process::Stdio;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, Result};
use crate::timeline::TimelineEntry;

/// Output frame size (landscape 1080p).
const FRAME_WIDTH: u32 = 1920;
const FRAME_HEIGHT: u32 = 1080;
const FRAME_RATE: u32 = 30;

/// Stream a clip into the run workspace.
pub async fn download_clip(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    let response = client.get(url).send().await.map_err(|e| MediaError::Download {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if !response.status().is_success() {
        return Err(MediaError::Download {
            url: url.to_string(),
            message: format!("HTTP {}", response.status()),
        });
    }

    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| MediaError::Download {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    debug!(url = %url, path = %dest.display(), "clip downloaded");
    Ok(())
}

/// Build the ffmpeg filter graph merging the planned cuts into one video
/// stream. Clips are inputs `0..clip_count`; the narration is the input after
/// them and is mapped directly, untouched.
pub fn filter_graph(plan: &[TimelineEntry]) -> String {
    let mut graph = String::new();
    for (i, entry) in plan.iter().enumerate() {
        graph.push_str(&format!(
            "[{input}:v]trim=duration={take:.3},setpts=PTS-STARTPTS,\
             scale={w}:{h}:force_original_aspect_ratio=increase,\
             crop={w}:{h},setsar=1,fps={fps}[v{i}];",
            input = entry.clip_index,
            take = entry.take_secs,
            w = FRAME_WIDTH,
            h = FRAME_HEIGHT,
            fps = FRAME_RATE,
            i = i,
        ));
    }
    for i in 0..plan.len() {
        graph.push_str(&format!("[v{}]", i));
    }
    graph.push_str(&format!("concat=n={}:v=1:a=0[vout]", plan.len()));
    graph
}

/// Merge clips and narration into one encoded file.
pub async fn encode(
    clip_paths: &[&Path],
    narration_path: &Path,
    plan: &[TimelineEntry],
    output: &Path,
) -> Result<()> {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-y");
    for path in clip_paths {
        cmd.arg("-i").arg(path);
    }
    cmd.arg("-i").arg(narration_path);
    cmd.args(["-filter_complex", &filter_graph(plan)])
        .args(["-map", "[vout]"])
        .arg("-map")
        .arg(format!("{}:a", clip_paths.len()))
        .args(["-c:v", "libx264", "-preset", "veryfast", "-pix_fmt", "yuv420p"])
        .args(["-c:a", "aac", "-b:a", "192k"])
        .arg("-shortest")
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let out = cmd.output().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MediaError::MissingTool("ffmpeg".to_string())
        } else {
            MediaError::Io(e)
        }
    })?;

    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        // The useful diagnostic is at the end of ffmpeg's output.
        let tail: String = stderr
            .lines()
            .rev()
            .take(5)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join("\n");
        return Err(MediaError::Ffmpeg(tail));
    }

    Ok(())
}
