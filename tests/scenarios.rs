//! End-to-end scenarios: init, NTSC cartridge, 32X image, input, save states
//! and region switching, driven through the adapter with a scripted core.

mod common;

use common::{loaded_adapter, make_rom, FakeCore};
use picodrive_web::core::PixelFormat;
use picodrive_web::{Adapter, Buttons, HardwareRegion, STATE_MAX_SIZE};

const ROM_512K: usize = 512 * 1024;
const ROM_3M: usize = 3 * 1024 * 1024;

fn scenario_2() -> Adapter<FakeCore> {
    let mut adapter = loaded_adapter(&make_rom(ROM_512K, "SONIC THE HEDGEHOG", b'U'), "game.bin");
    for _ in 0..60 {
        adapter.run_frame();
    }
    adapter
}

#[test]
fn test_scenario_1_init_geometry() {
    let mut adapter = Adapter::new(Box::new(FakeCore::new()));
    adapter.init();

    assert!(adapter.is_initialized());
    assert_eq!(adapter.video_width(), 320);
    assert_eq!(adapter.video_height(), 240);
    assert!(!adapter.is_pal());
}

#[test]
fn test_scenario_2_ntsc_cartridge_runs() {
    let adapter = scenario_2();

    assert!(adapter.is_game_loaded());
    assert_eq!(adapter.frame_count(), 60);
    assert_eq!(adapter.core().frame_no, 60);
    assert!(!adapter.is_pal());
    assert_eq!(adapter.hardware_region(), HardwareRegion::Usa);

    assert_eq!(adapter.video_width(), 320);
    assert_eq!(adapter.video_height(), 224);
    assert!(adapter.visible_frame().iter().any(|&p| p != 0));
    assert_eq!(adapter.rom_name(), b"SONIC THE HEDGEHOG");
}

#[test]
fn test_scenario_3_32x_image_by_extension() {
    let mut rom = make_rom(ROM_3M, "VIRTUA RACING DELUXE", b'U');
    rom[0x100..0x110].copy_from_slice(b"SEGA 32X        ");

    let mut adapter = loaded_adapter(&rom, "game.32x");

    let core = adapter.core();
    assert_eq!(core.startups_32x, 1);
    assert_eq!(core.sh2_resets, 1);
    assert_eq!(core.draw.format, Some((PixelFormat::Rgb555, false)));
    let out = core.draw.out.expect("framebuffer re-registered after 32X startup");
    assert_eq!(out.pitch(), 640);
    assert_eq!(out.ptr().as_ptr() as *const u16, adapter.frontend().video().base_ptr());

    adapter.run_frame();
    assert_eq!(adapter.frame_count(), 1);
    assert!(adapter.visible_frame().iter().any(|&p| p != 0));
}

#[test]
fn test_scenario_4_input_reaches_guest() {
    let mut adapter = scenario_2();

    adapter.set_input(0, (1 << 7) | (1 << 6));
    adapter.run_frame();

    let pads = *adapter.core().pad_log.last().unwrap();
    let pad0 = Buttons::from_bits_retain(pads[0]);
    assert!(pad0.contains(Buttons::START | Buttons::A));
    assert_eq!(pad0, Buttons::START | Buttons::A);
    assert_eq!(pads[1], 0);
}

#[test]
fn test_scenario_5_state_round_trip() {
    let mut adapter = scenario_2();

    let size = adapter.state_save().unwrap();
    assert!(size > 0 && size <= 2 * 1024 * 1024);
    assert_eq!(adapter.state_size(), size);
    let saved = adapter.state_bytes().unwrap().to_vec();

    adapter.reset();
    assert_eq!(adapter.core().frame_no, 0);

    adapter.state_load().unwrap();
    assert_eq!(adapter.core().frame_no, 60);
    assert_eq!(adapter.state_bytes().unwrap(), &saved[..]);
    assert!(size <= STATE_MAX_SIZE);
}

#[test]
fn test_scenario_5_restored_state_reproduces_next_frame() {
    let mut reference = scenario_2();
    reference.run_frame();
    let expected_video = reference.visible_frame().to_vec();
    let expected_audio = reference.audio_samples().to_vec();

    let mut adapter = scenario_2();
    adapter.state_save().unwrap();
    for _ in 0..10 {
        adapter.run_frame();
    }
    adapter.state_load().unwrap();
    adapter.run_frame();

    assert_eq!(adapter.visible_frame(), &expected_video[..]);
    assert_eq!(adapter.audio_samples(), &expected_audio[..]);
}

#[test]
fn test_scenario_6_region_switch_to_europe() {
    let mut adapter = scenario_2();
    assert_eq!(adapter.core().audio_lens.last(), Some(&(735 * 4)));

    adapter.set_region(8);

    assert!(adapter.is_pal());
    assert_eq!(adapter.region(), 0xC0);
    assert_eq!(adapter.core().rerates, vec![false, false]);

    adapter.run_frame();
    assert_eq!(adapter.core().audio_lens.last(), Some(&(882 * 4)));
    assert_eq!(adapter.audio_samples().len(), 882 * 2);
}
