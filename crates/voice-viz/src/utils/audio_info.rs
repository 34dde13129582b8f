//! Output device listing for the `devices` subcommand.

use crate::audio::list_output_devices;

/// Print every output device, marking the system default
pub fn log_audio_info() {
    let devices = list_output_devices();

    println!("\n=== Audio Output Devices ===");
    if devices.is_empty() {
        println!("  (none found)");
    }
    for (idx, (name, is_default)) in devices.iter().enumerate() {
        let marker = if *is_default { " (default)" } else { "" };
        println!("  [{}] {}{}", idx, name, marker);
    }
    println!("Set `output_device` in ~/.voice-viz.toml to pick one\n");
}
