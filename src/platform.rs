//! The platform host contract: traits an embedder implements so the core systems never
//! depend on a concrete window, filesystem, or audio-output backend. Each trait ships one
//! in-process reference implementation used by tests and headless tools, never a production
//! backend (a real game embeds its own Win32/X11/CoreAudio implementation of these).

use {
    crate::math::Vec2,
    std::{
        io,
        path::{Path, PathBuf},
        time::SystemTime,
    },
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// One platform event translated from whatever the host's window system delivered.
#[derive(Clone, Debug)]
pub enum PlatformEvent {
    MouseButton { pressed: bool, button: MouseButton },
    Key { pressed: bool, keycode: u32 },
    /// UTF-8 text input, at most 4 bytes.
    Text(String),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GamepadState {
    pub connected: bool,
    pub left_stick: Vec2,
    pub right_stick: Vec2,
    pub left_trigger: f32,
    pub right_trigger: f32,
    pub buttons_down: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorRequest {
    Default,
    Hidden,
}

/// One frame's platform IO: fields the host fills in before calling `tick`, plus the handful the
/// game writes back for the host to apply.
pub struct PlatformIo<'a> {
    pub has_focus: bool,
    pub dt: f32,
    pub mouse_p: Vec2,
    pub mouse_dp: Vec2,
    pub mouse_wheel: f32,
    pub gamepads: [GamepadState; 4],
    pub events: &'a [PlatformEvent],
    /// The cursor shape the host currently has set.
    pub cursor: CursorRequest,

    /// The cursor shape the game wants applied before the next frame.
    pub requested_cursor: CursorRequest,
    pub lock_cursor: bool,
    pub request_exit: bool,
}

impl<'a> PlatformIo<'a> {
    pub fn new(events: &'a [PlatformEvent]) -> Self {
        Self {
            has_focus: true,
            dt: 0.0,
            mouse_p: Vec2::ZERO,
            mouse_dp: Vec2::ZERO,
            mouse_wheel: 0.0,
            gamepads: [GamepadState::default(); 4],
            events,
            cursor: CursorRequest::Default,
            requested_cursor: CursorRequest::Default,
            lock_cursor: false,
            request_exit: false,
        }
    }
}

/// Implemented by the game; `tick` runs once per frame on the main thread`).
pub trait PlatformHooks {
    fn tick(&mut self, io: &mut PlatformIo);
}

/// Implemented by the game; `tick_audio` runs from the audio thread and must fill `output` with
/// interleaved samples`; audio format is 2-channel IEEE float at
/// 44.1 kHz per the audio-output plugin contract below).
pub trait AudioHooks: Send {
    fn tick_audio(&mut self, frame_count: usize, output: &mut [f32]);
}

/// The filesystem contract every asset path goes through.
pub trait FilesystemPlugin {
    fn read_entire_file(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn write_entire_file(&self, path: &Path, data: &[u8]) -> io::Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn copy_directory(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn scan_directory(&self, path: &Path, recursive: bool, include_dotfiles: bool) -> io::Result<Vec<PathBuf>>;
    fn create_directory(&self, path: &Path) -> io::Result<()>;
    fn full_path(&self, path: &Path) -> io::Result<PathBuf>;

    /// Correctly combines a file's high/low 32-bit write-time words.
    fn last_write_time(&self, path: &Path) -> io::Result<SystemTime>;

    /// Always appends a fixed `generated` subdirectory.
    fn create_generated_subdir(&self, path: &Path) -> io::Result<PathBuf> {
        let dir = path.join("generated");
        self.create_directory(&dir)?;
        Ok(dir)
    }
}

/// The audio-output contract: the host starts a real-time thread and repeatedly invokes the
/// callback with however many frames it needs filled.
pub trait AudioOutputPlugin {
    fn start_audio_thread(&self, callback: Box<dyn FnMut(usize, &mut [f32]) + Send>);
}

/// A direct `std::fs`-backed reference implementation of [`FilesystemPlugin`], used by tests and
/// headless tools rather than shipped as a production asset-streaming backend.
pub struct StdFilesystem;

impl FilesystemPlugin for StdFilesystem {
    fn read_entire_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_entire_file(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        std::fs::write(path, data)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::copy(from, to).map(|_| ())
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn copy_directory(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::create_dir_all(to)?;
        for entry in std::fs::read_dir(from)? {
            let entry = entry?;
            let dest = to.join(entry.file_name());
            if entry.file_type()?.is_dir() {
                self.copy_directory(&entry.path(), &dest)?;
            } else {
                std::fs::copy(entry.path(), dest)?;
            }
        }
        Ok(())
    }

    fn scan_directory(&self, path: &Path, recursive: bool, include_dotfiles: bool) -> io::Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let name = entry.file_name();
            if !include_dotfiles && name.to_string_lossy().starts_with('.') {
                continue;
            }
            let path = entry.path();
            if recursive && entry.file_type()?.is_dir() {
                out.extend(self.scan_directory(&path, recursive, include_dotfiles)?);
            } else {
                out.push(path);
            }
        }
        Ok(out)
    }

    fn create_directory(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn full_path(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn last_write_time(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_generated_subdir_always_names_it_generated() {
        let dir = std::env::temp_dir().join(format!("quartz-engine-fs-test-{:x}", std::process::id()));
        let fs = StdFilesystem;
        let generated = fs.create_generated_subdir(&dir).unwrap();
        assert_eq!(generated.file_name().unwrap(), "generated");
        assert!(generated.is_dir());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn round_trips_a_written_file() {
        let path = std::env::temp_dir().join(format!("quartz-engine-fs-test-{:x}.bin", std::process::id()));
        let fs = StdFilesystem;
        fs.write_entire_file(&path, b"hello").unwrap();
        assert_eq!(fs.read_entire_file(&path).unwrap(), b"hello");
        std::fs::remove_file(&path).ok();
    }
}
