use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

/// GPU copy of the canvas, re-uploaded only when the surface revision changes
pub struct CanvasTexture {
    name: String,
    handle: Option<TextureHandle>,
    revision: Option<u64>,
}

impl CanvasTexture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: None,
            revision: None,
        }
    }

    /// Texture for `revision`, calling `image` only when it is stale
    pub fn texture_id(&mut self, ctx: &Context, revision: u64, image: impl FnOnce() -> ColorImage) -> TextureId {
        if let Some(handle) = &self.handle {
            if self.revision == Some(revision) {
                return handle.id();
            }
        }
        let image = image();
        let handle = match self.handle.take() {
            Some(mut handle) => {
                handle.set(image, TextureOptions::NEAREST);
                handle
            }
            None => ctx.load_texture(&self.name, image, TextureOptions::NEAREST),
        };
        log::trace!("Uploaded {} at revision {}", self.name, revision);
        let id = handle.id();
        self.handle = Some(handle);
        self.revision = Some(revision);
        id
    }
}
