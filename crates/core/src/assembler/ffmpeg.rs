//! FFmpeg-based assembler implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::AssemblerConfig;
use super::error::AssemblerError;
use super::traits::Assembler;
use super::types::{AssemblyJob, AssemblyResult};

/// FFmpeg-based assembler implementation.
///
/// Joins clips with an `xfade`/`acrossfade` filter chain; a single-clip job
/// is remuxed without re-encoding.
pub struct FfmpegAssembler {
    config: AssemblerConfig,
}

impl FfmpegAssembler {
    /// Creates a new ffmpeg assembler with the given configuration.
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// Creates an assembler with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(AssemblerConfig::default())
    }

    /// Probes a clip's duration in seconds via ffprobe.
    async fn probe_duration(&self, path: &Path) -> Result<f64, AssemblerError> {
        let output = Command::new(&self.config.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AssemblerError::FfprobeNotFound {
                        path: self.config.ffprobe_path.clone(),
                    }
                } else {
                    AssemblerError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(AssemblerError::probe_failed(format!(
                "ffprobe exited with code {:?} for {}",
                output.status.code(),
                path.display()
            )));
        }

        parse_probe_duration(&String::from_utf8_lossy(&output.stdout))
    }

    /// Builds ffmpeg arguments for a multi-clip crossfade assembly.
    fn build_xfade_args(&self, job: &AssemblyJob, durations: &[f64]) -> Vec<String> {
        let mut args = vec!["-y".to_string()];

        for clip in &job.clips {
            args.extend(["-i".to_string(), clip.to_string_lossy().to_string()]);
        }

        let n = job.clips.len();
        let d = job.transition.duration_secs;
        let mut filter = String::new();

        // Video chain: each join crossfades the accumulated chain with the
        // next input. The offset of join k is the accumulated duration of
        // clips 0..=k minus the overlap consumed by the k+1 fades so far.
        let mut elapsed = 0.0;
        let mut video_in = "[0:v]".to_string();
        for k in 0..n - 1 {
            elapsed += durations[k];
            let offset = (elapsed - (k as f64 + 1.0) * d).max(0.0);
            let out = format!("[v{}]", k + 1);
            filter.push_str(&format!(
                "{}[{}:v]xfade=transition={}:duration={}:offset={:.3}{};",
                video_in,
                k + 1,
                job.transition.xfade,
                d,
                offset,
                out
            ));
            video_in = out;
        }

        // Audio chain mirrors the video joins with acrossfade.
        let mut audio_in = "[0:a]".to_string();
        for k in 0..n - 1 {
            let out = format!("[a{}]", k + 1);
            filter.push_str(&format!(
                "{}[{}:a]acrossfade=d={}{};",
                audio_in,
                k + 1,
                d,
                out
            ));
            audio_in = out;
        }
        filter.pop(); // trailing semicolon

        args.extend([
            "-filter_complex".to_string(),
            filter,
            "-map".to_string(),
            video_in,
            "-map".to_string(),
            audio_in,
            "-c:v".to_string(),
            "libx264".to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-movflags".to_string(),
            "+faststart".to_string(),
        ]);

        args.extend(["-loglevel".to_string(), self.config.log_level.clone()]);
        args.extend(self.config.extra_args.iter().cloned());
        args.push(job.output_path.to_string_lossy().to_string());

        args
    }

    /// Builds ffmpeg arguments for a single-clip remux.
    fn build_remux_args(&self, job: &AssemblyJob) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-i".to_string(),
            job.clips[0].to_string_lossy().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            "-movflags".to_string(),
            "+faststart".to_string(),
            "-loglevel".to_string(),
            self.config.log_level.clone(),
        ];
        args.extend(self.config.extra_args.iter().cloned());
        args.push(job.output_path.to_string_lossy().to_string());
        args
    }

    async fn run_ffmpeg(&self, args: &[String]) -> Result<(), AssemblerError> {
        debug!(?args, "running ffmpeg");

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AssemblerError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    AssemblerError::Io(e)
                }
            })?;

        let stderr = child.stderr.take().expect("stderr should be captured");
        let mut reader = BufReader::new(stderr).lines();

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let result = timeout(timeout_duration, async {
            let mut error_output = String::new();
            while let Ok(Some(line)) = reader.next_line().await {
                if line.to_lowercase().contains("error") {
                    error_output.push_str(&line);
                    error_output.push('\n');
                }
            }
            let status = child.wait().await?;
            Ok::<(std::process::ExitStatus, String), std::io::Error>((status, error_output))
        })
        .await;

        match result {
            Ok(Ok((status, error_output))) => {
                if !status.success() {
                    return Err(AssemblerError::assembly_failed(
                        format!("FFmpeg exited with code: {:?}", status.code()),
                        if error_output.is_empty() {
                            None
                        } else {
                            Some(error_output)
                        },
                    ));
                }
                Ok(())
            }
            Ok(Err(e)) => Err(AssemblerError::Io(e)),
            Err(_) => {
                // Kill the process on timeout
                let _ = child.kill().await;
                Err(AssemblerError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        }
    }
}

#[async_trait]
impl Assembler for FfmpegAssembler {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn assemble(&self, job: AssemblyJob) -> Result<AssemblyResult, AssemblerError> {
        let start = Instant::now();

        if job.clips.is_empty() {
            return Err(AssemblerError::EmptyJob);
        }
        for clip in &job.clips {
            if !tokio::fs::try_exists(clip).await.unwrap_or(false) {
                return Err(AssemblerError::ClipNotFound { path: clip.clone() });
            }
        }

        if let Some(parent) = job.output_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|_| {
                AssemblerError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                }
            })?;
        }

        let args = if job.clips.len() == 1 {
            self.build_remux_args(&job)
        } else {
            let mut durations = Vec::with_capacity(job.clips.len());
            for clip in &job.clips {
                durations.push(self.probe_duration(clip).await?);
            }
            self.build_xfade_args(&job, &durations)
        };

        self.run_ffmpeg(&args).await?;

        let output_meta = tokio::fs::metadata(&job.output_path)
            .await
            .map_err(|_| AssemblerError::assembly_failed("Output file not created", None))?;

        Ok(AssemblyResult {
            output_path: job.output_path,
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Parses ffprobe JSON output into a duration in seconds.
fn parse_probe_duration(output: &str) -> Result<f64, AssemblerError> {
    #[derive(Deserialize)]
    struct ProbeOutput {
        format: ProbeFormat,
    }

    #[derive(Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }

    let probe: ProbeOutput =
        serde_json::from_str(output).map_err(|e| AssemblerError::ProbeFailed {
            reason: format!("Failed to parse ffprobe output: {}", e),
        })?;

    probe
        .format
        .duration
        .as_ref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| AssemblerError::probe_failed("missing duration in ffprobe output"))
}
