//! Frame naming and animated GIF assembly.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use tracing::{debug, info};

/// Milliseconds each frame is shown.
const FRAME_DELAY_MS: u32 = 250;

/// Builds the conventional frame path `<dir>/<date>_<kind>_cases.png`.
///
/// The date prefix makes lexicographic file order chronological, which
/// [`assemble_gif`] relies on.
pub fn frame_path(dir: &Path, date: &str, kind: crate::charts::CaseKind) -> PathBuf {
    dir.join(format!("{date}_{}_cases.png", kind.file_kind()))
}

/// Assembles every `.png` in `input_dir` (in name order) into an
/// animated GIF at `output`. Returns the number of frames encoded.
#[tracing::instrument(fields(input_dir = %input_dir.display(), output = %output.display()))]
pub fn assemble_gif(input_dir: &Path, output: &Path) -> Result<usize> {
    let mut frames = Vec::new();
    for entry in std::fs::read_dir(input_dir)
        .with_context(|| format!("reading frame directory {}", input_dir.display()))?
    {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("png") {
            frames.push(path);
        }
    }
    frames.sort();

    ensure!(
        !frames.is_empty(),
        "no .png frames found in {}",
        input_dir.display()
    );

    let file = File::create(output)
        .with_context(|| format!("creating {}", output.display()))?;
    let mut encoder = GifEncoder::new(file);
    encoder.set_repeat(Repeat::Infinite)?;

    for path in &frames {
        debug!(frame = %path.display(), "Encoding frame");
        let img = image::open(path)
            .with_context(|| format!("decoding frame {}", path.display()))?
            .to_rgba8();
        let frame = Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(FRAME_DELAY_MS, 1));
        encoder.encode_frame(frame)?;
    }

    info!(frames = frames.len(), "GIF assembled");
    Ok(frames.len())
}
