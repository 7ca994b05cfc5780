use std::sync::atomic::{AtomicU8, Ordering};

/// A handle-pool tag type; textures are referenced as `Handle<Texture>` everywhere else in the
/// engine. No fields: the RHI implementation owns the actual backing resource.
#[derive(Clone, Copy, Debug)]
pub struct Texture;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PixelFormat {
    R8,
    Rg8,
    Rgba8,
    Srgb8A8,
    R11G11B10F,
    R32G32B32F,
    R32G32B32A32F,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextureType {
    D2,
    D3,
}

/// Whether a texture was uploaded with a single level or should have mips generated.
///
/// The original source initializes a `MipLevels` count inconsistently (`0` in one path meaning
/// "auto-generate", `1` in another meaning "single level") for what should be the same logical
/// case; this port pins the choice explicitly per upload instead of inferring it from a
/// magic count.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MipLevels {
    Single,
    Auto,
}

#[derive(Clone, Copy, Debug)]
pub struct TextureDesc {
    pub ty: TextureType,
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub cubemap: bool,
    pub mip_levels: MipLevels,
}

impl TextureDesc {
    pub fn texture_2d(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            ty: TextureType::D2,
            format,
            width,
            height,
            depth: 1,
            cubemap: false,
            mip_levels: MipLevels::Single,
        }
    }

    pub fn texture_3d(width: u32, height: u32, depth: u32, format: PixelFormat) -> Self {
        Self {
            ty: TextureType::D3,
            format,
            width,
            height,
            depth,
            cubemap: false,
            mip_levels: MipLevels::Single,
        }
    }
}

/// Pixel data for an upload: `pixels` for a plain 2D/3D texture, or six `faces` for a cubemap.
pub enum TextureUpload {
    Flat { pitch: u32, pixels: Vec<u8> },
    Cubemap { pitch: u32, faces: [Vec<u8>; 6] },
}

/// The texture publication state machine:
/// `None -> Reserved -> Loading -> Loaded -> (DestroyPending) -> None`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum TextureState {
    None = 0,
    Reserved = 1,
    Loading = 2,
    Loaded = 3,
    DestroyPending = 4,
}

impl TextureState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::None,
            1 => Self::Reserved,
            2 => Self::Loading,
            3 => Self::Loaded,
            _ => Self::DestroyPending,
        }
    }
}

/// An atomic cell holding a [`TextureState`], used by RHI implementations to publish texture
/// readiness without locking.
pub struct AtomicTextureState(AtomicU8);

impl AtomicTextureState {
    pub fn new(state: TextureState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub fn load(&self) -> TextureState {
        TextureState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, state: TextureState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Returns `true` and applies the transition iff the current state is `from`.
    pub fn try_transition(&self, from: TextureState, to: TextureState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
