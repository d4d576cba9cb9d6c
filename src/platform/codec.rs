//! MP3 and OGG entry points for CD audio tracks.
//!
//! Compressed tracks are not supported in the web build. The core may call
//! these unconditionally: lengths and bitrates read as 0 and the update
//! functions add nothing to the mix buffer.

pub fn mp3_get_bitrate(_size: usize) -> i32 {
    0
}

pub fn mp3_start_play(_pos: i32) {}

pub fn mp3_update(_buffer: &mut [i32], _stereo: bool) {}

pub fn ogg_get_length() -> i32 {
    0
}

pub fn ogg_start_play(_sample_offset: i32) {}

pub fn ogg_stop_play() {}

pub fn ogg_update(_buffer: &mut [i32], _stereo: bool) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stubs_are_silent() {
        assert_eq!(mp3_get_bitrate(1 << 20), 0);
        assert_eq!(ogg_get_length(), 0);

        let mut mix = [7i32; 16];
        mp3_start_play(0);
        mp3_update(&mut mix, true);
        ogg_start_play(0);
        ogg_update(&mut mix, true);
        ogg_stop_play();
        assert_eq!(mix, [7i32; 16]);
    }
}
