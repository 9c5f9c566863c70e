//! Filter graph construction.
//!
//! A [`RenderPlan`] is a pure description of the edit: which clips go in,
//! how long the result is, where the fades sit, and the ffmpeg arguments
//! that realise it. Nothing here touches the filesystem.

use crate::config::RenderSettings;
use crate::error::{ReelError, Result};
use std::ffi::OsString;
use std::path::Path;

/// The complete edit for one video.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub clip_count: usize,
    /// Length of the concatenated clips.
    pub timeline_seconds: f64,
    /// Length of the encoded output.
    pub output_seconds: f64,
    pub fade_seconds: f64,
    pub fade_out_start: f64,
    pub caption_seconds: f64,
    pub trim_before_fade: bool,
    caption_font: String,
    caption_font_size: u32,
    caption_color: String,
    video_codec: String,
    audio_codec: String,
}

impl RenderPlan {
    /// Plan an edit over clips of the given durations, in order.
    pub fn new(settings: &RenderSettings, clip_durations: &[f64]) -> Result<Self> {
        if clip_durations.is_empty() {
            return Err(ReelError::Composition("No clips to compose".to_string()));
        }
        if let Some(bad) = clip_durations.iter().find(|d| !d.is_finite() || **d <= 0.0) {
            return Err(ReelError::Composition(format!("Invalid clip duration: {}", bad)));
        }

        let timeline_seconds: f64 = clip_durations.iter().sum();
        let output_seconds = timeline_seconds.min(settings.max_duration_seconds);

        // Fades never overlap each other on very short videos
        let fade_seconds = settings.fade_seconds.max(0.0).min(output_seconds / 2.0);

        let fade_out_start = if settings.trim_before_fade {
            output_seconds - fade_seconds
        } else {
            timeline_seconds - fade_seconds
        };

        Ok(Self {
            width: settings.width,
            height: settings.height,
            fps: settings.fps,
            clip_count: clip_durations.len(),
            timeline_seconds,
            output_seconds,
            fade_seconds,
            fade_out_start,
            caption_seconds: settings.caption_seconds.min(output_seconds),
            trim_before_fade: settings.trim_before_fade,
            caption_font: settings.caption_font.clone(),
            caption_font_size: settings.caption_font_size,
            caption_color: settings.caption_color.clone(),
            video_codec: settings.video_codec.clone(),
            audio_codec: settings.audio_codec.clone(),
        })
    }

    /// Whether the output is shorter than the concatenated clips.
    pub fn is_truncated(&self) -> bool {
        self.output_seconds < self.timeline_seconds
    }

    /// The `-filter_complex` graph. Clip inputs are `0..clip_count`, the
    /// narration is input `clip_count`, and the caption text is read from
    /// `caption_file`.
    pub fn filter_graph(&self, caption_file: &Path) -> String {
        let mut chains = Vec::with_capacity(self.clip_count + 3);

        // Every clip is forced to the output frame so concat accepts them
        for i in 0..self.clip_count {
            chains.push(format!(
                "[{i}:v]scale={w}:{h},setsar=1,fps={fps},format=yuv420p[v{i}]",
                i = i,
                w = self.width,
                h = self.height,
                fps = self.fps
            ));
        }

        let inputs: String = (0..self.clip_count).map(|i| format!("[v{}]", i)).collect();
        chains.push(format!("{}concat=n={}:v=1:a=0[cat]", inputs, self.clip_count));

        let caption = format!(
            "drawtext=textfile={file}:expansion=none:font={font}:fontsize={size}:fontcolor={color}:\
             x=(w-text_w)/2:y=(h-text_h)/2:enable='between(t,0,{until:.3})'",
            file = quote_filter_value(&caption_file.to_string_lossy()),
            font = quote_filter_value(&self.caption_font),
            size = self.caption_font_size,
            color = quote_filter_value(&self.caption_color),
            until = self.caption_seconds
        );
        let fades = format!(
            "fade=t=in:st=0:d={d:.3},fade=t=out:st={st:.3}:d={d:.3}",
            d = self.fade_seconds,
            st = self.fade_out_start
        );
        let trim = format!("trim=duration={:.3},setpts=PTS-STARTPTS", self.output_seconds);

        let video = if self.trim_before_fade {
            format!("[cat]{},{},{}[outv]", caption, trim, fades)
        } else {
            format!("[cat]{},{},{}[outv]", caption, fades, trim)
        };
        chains.push(video);

        // The narration replaces whatever audio the clips carried
        chains.push(format!(
            "[{}:a]atrim=duration={:.3},asetpts=PTS-STARTPTS[outa]",
            self.clip_count, self.output_seconds
        ));

        chains.join(";")
    }

    /// Full ffmpeg argument list.
    pub fn ffmpeg_args(
        &self,
        clips: &[impl AsRef<Path>],
        narration: &Path,
        caption_file: &Path,
        output: &Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-loglevel".into(), "error".into()];

        for clip in clips {
            args.push("-i".into());
            args.push(clip.as_ref().as_os_str().to_owned());
        }
        args.push("-i".into());
        args.push(narration.as_os_str().to_owned());

        args.push("-filter_complex".into());
        args.push(self.filter_graph(caption_file).into());

        for arg in [
            "-map", "[outv]",
            "-map", "[outa]",
            "-c:v", self.video_codec.as_str(),
            "-pix_fmt", "yuv420p",
            "-c:a", self.audio_codec.as_str(),
            "-movflags", "+faststart",
        ] {
            args.push(arg.into());
        }
        args.push("-r".into());
        args.push(self.fps.to_string().into());
        args.push("-t".into());
        args.push(format!("{:.3}", self.output_seconds).into());
        args.push(output.as_os_str().to_owned());

        args
    }
}

/// Quote a value for use as a filter option inside `-filter_complex`.
///
/// ffmpeg unescapes twice: the graph parser strips the outer quotes, then the
/// filter splits its options on `:`. Option-level escapes go on first so they
/// survive the graph pass.
pub fn quote_filter_value(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'");
    format!("'{}'", escaped)
}
