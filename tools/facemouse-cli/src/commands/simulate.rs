//! Write a scripted landmark stream.

use std::io::Write;
use std::path::PathBuf;

use facemouse_controller::synthetic::demo_session;
use facemouse_controller::writer::JsonlWriter;
use facemouse_landmark_model::serialize_frames;

pub fn run(hold: usize, output: Option<PathBuf>) -> anyhow::Result<()> {
    let frames = demo_session(hold);

    match output {
        Some(path) => {
            let mut writer = JsonlWriter::create(&path)?;
            for frame in &frames {
                writer.write_record(frame)?;
            }
            writer.flush()?;
            eprintln!("Wrote {} frames to {}", frames.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(serialize_frames(&frames)?.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
