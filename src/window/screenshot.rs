use crate::error::Result;
use crate::resource::RenderTarget;
use std::path::Path;

/// Saves `target` as an 8-bit sRGB image; the format follows the extension.
pub fn save_screenshot(target: &RenderTarget, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    target.to_rgba8().save(path)?;
    log::info!(
        "saved {}x{} screenshot to {}",
        target.width(),
        target.height(),
        path.display()
    );
    Ok(())
}
