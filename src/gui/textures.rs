//! Font atlas and texture bookkeeping for a GUI context.

use std::collections::HashMap;
use std::sync::Arc;

use egui::{FontData, FontDefinitions, FontFamily, TextureId, TexturesDelta};

use super::io::IoState;

/// Custom hook run over the font definitions before the atlas is built.
pub type FontInitializer = Arc<dyn Fn(&mut FontDefinitions) + Send + Sync>;

/// An extra font added to the atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSource {
    pub name: String,
    pub data: Vec<u8>,
    pub family: FontFamily,
    /// Put in front of the family's fallback chain instead of the back
    pub prepend: bool,
}

/// Font atlas configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FontAtlasConfig {
    /// Start from egui's bundled fonts; otherwise from an empty set
    pub include_default_fonts: bool,
    pub fonts: Vec<FontSource>,
}

impl Default for FontAtlasConfig {
    fn default() -> Self {
        Self {
            include_default_fonts: true,
            fonts: Vec::new(),
        }
    }
}

impl FontAtlasConfig {
    fn definitions(&self) -> FontDefinitions {
        let mut defs = if self.include_default_fonts {
            FontDefinitions::default()
        } else {
            FontDefinitions::empty()
        };

        for font in &self.fonts {
            defs.font_data.insert(
                font.name.clone(),
                Arc::new(FontData::from_owned(font.data.clone())),
            );
            let chain = defs.families.entry(font.family.clone()).or_default();
            if font.prepend {
                chain.insert(0, font.name.clone());
            } else {
                chain.push(font.name.clone());
            }
        }
        defs
    }
}

/// Origin of a tracked texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureOrigin {
    /// Managed by egui: the font atlas and images it loads
    Managed,
    /// Registered by the application
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub size: [usize; 2],
    pub origin: TextureOrigin,
}

/// Tracks the font atlas and every texture renderers may be asked to bind.
#[derive(Default)]
pub struct TextureManager {
    initialized: bool,
    atlas_built: bool,
    atlas_generation: u64,
    textures: HashMap<TextureId, TextureInfo>,
    /// Frees from the last frame's delta, applied once that frame was drawn
    pending_free: Vec<TextureId>,
    next_user_texture_id: u64,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the context's fonts. egui rasterizes the atlas on the next pass.
    pub fn build_font_atlas(
        &mut self,
        ctx: &egui::Context,
        io: &IoState,
        config: &FontAtlasConfig,
        initializer: Option<&FontInitializer>,
    ) {
        crate::profile_scope!("build_font_atlas");

        let mut defs = config.definitions();
        if let Some(init) = initializer {
            init(&mut defs);
        }
        ctx.set_fonts(defs);

        self.atlas_built = true;
        self.atlas_generation += 1;
        log::debug!(
            "Font atlas built (generation {}, {} ppp)",
            self.atlas_generation,
            io.pixels_per_point
        );
    }

    pub fn initialize(&mut self, io: &mut IoState) {
        self.initialized = true;
        log::debug!(
            "Texture manager initialized for renderer {:?}",
            io.backend_renderer_name
        );
    }

    /// Drop textures freed by the previous frame.
    pub fn prepare_frame(&mut self, _io: &IoState) {
        for id in self.pending_free.drain(..) {
            self.textures.remove(&id);
        }
    }

    /// Record a frame's texture changes. Sets apply now; frees wait for the next
    /// [`prepare_frame`](Self::prepare_frame).
    pub fn track_delta(&mut self, delta: &TexturesDelta) {
        for (id, image) in &delta.set {
            if image.pos.is_some() && self.textures.contains_key(id) {
                continue;
            }
            self.textures.insert(
                *id,
                TextureInfo {
                    size: image.image.size(),
                    origin: TextureOrigin::Managed,
                },
            );
        }
        self.pending_free.extend(delta.free.iter().copied());
    }

    /// Register an application texture so it can be shown with `ui.image()`.
    pub fn register_user_texture(&mut self, size: [usize; 2]) -> TextureId {
        let id = TextureId::User(self.next_user_texture_id);
        self.next_user_texture_id += 1;
        self.textures.insert(
            id,
            TextureInfo {
                size,
                origin: TextureOrigin::User,
            },
        );
        id
    }

    pub fn unregister_user_texture(&mut self, id: TextureId) {
        if matches!(id, TextureId::User(_)) {
            self.textures.remove(&id);
        } else {
            log::warn!("Attempted to unregister non-user texture {:?}", id);
        }
    }

    pub fn shutdown(&mut self) {
        self.textures.clear();
        self.pending_free.clear();
        self.initialized = false;
    }

    pub fn destroy_font_atlas(&mut self, ctx: &egui::Context) {
        if !self.atlas_built {
            return;
        }
        ctx.set_fonts(FontDefinitions::empty());
        self.textures.remove(&TextureId::default());
        self.atlas_built = false;
        log::debug!("Font atlas destroyed");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_atlas_built(&self) -> bool {
        self.atlas_built
    }

    /// Number of atlas builds over this manager's lifetime
    pub fn atlas_generation(&self) -> u64 {
        self.atlas_generation
    }

    pub fn texture(&self, id: TextureId) -> Option<&TextureInfo> {
        self.textures.get(&id)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}
