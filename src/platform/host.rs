//! Host notification sinks.
//!
//! Plain nullable C function pointers so the browser glue can register
//! `addFunction` trampolines; a native host simply leaves them unset.

use libc::c_char;

/// Called with the new visible `(width, height)` after a mode change.
pub type VideoModeFn = extern "C" fn(width: i32, height: i32);

/// Called with the first interleaved stereo sample and the stereo frame
/// count. The pointer is only valid for the duration of the call.
pub type AudioFn = extern "C" fn(samples: *const i16, frames: i32);

/// Called with one NUL-terminated log line.
pub type LogFn = extern "C" fn(line: *const c_char);

#[derive(Debug, Clone, Copy, Default)]
pub struct HostSinks {
    pub video_mode: Option<VideoModeFn>,
    pub audio: Option<AudioFn>,
}

impl HostSinks {
    pub fn notify_video_mode(&self, width: usize, height: usize) {
        if let Some(sink) = self.video_mode {
            sink(width as i32, height as i32);
        }
    }

    /// `samples` holds interleaved stereo data, two `i16` per frame.
    pub fn notify_audio(&self, samples: &[i16]) {
        if let Some(sink) = self.audio {
            sink(samples.as_ptr(), (samples.len() / 2) as i32);
        }
    }
}
