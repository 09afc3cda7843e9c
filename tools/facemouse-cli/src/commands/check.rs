//! Check pointer-control prerequisites.

use facemouse_controller::actuators::XdotoolActuator;
use facemouse_controller::Actuator;

pub fn run() -> anyhow::Result<()> {
    println!("Facemouse System Check");
    println!("{}", "=".repeat(50));

    match std::env::var("DISPLAY") {
        Ok(display) if !display.is_empty() => println!("[OK] X display: {display}"),
        _ => println!("[WARN] DISPLAY is not set; xdotool needs an X11 session"),
    }

    let mut xdotool = XdotoolActuator::new();
    if !xdotool.is_available() {
        println!("[MISSING] xdotool not found on PATH");
        println!();
        println!("Install xdotool, or run with `--actuator record` to use a simulated desktop.");
        return Ok(());
    }
    println!("[OK] xdotool available");

    let mut ready = true;
    match xdotool.screen_size() {
        Ok(screen) => println!("[OK] Screen: {}x{}", screen.width, screen.height),
        Err(e) => {
            ready = false;
            println!("[FAIL] Screen size: {e}");
        }
    }
    match xdotool.cursor_position() {
        Ok(cursor) => println!("[OK] Cursor at ({}, {})", cursor.x, cursor.y),
        Err(e) => {
            ready = false;
            println!("[FAIL] Cursor position: {e}");
        }
    }

    println!();
    if ready {
        println!("Pointer control is available. Facemouse is ready.");
    } else {
        println!("xdotool cannot reach the display. See above for details.");
    }

    Ok(())
}
