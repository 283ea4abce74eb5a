//! Thin wrapper over the minifb window the painting is shown in.
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::canvas::{Canvas, Surface};
use crate::error::Result;

/// Commands read from the keyboard between frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Fill,
    AddDetail,
    Regenerate,
    Stop,
}

/// The packed `0RGB` buffer handed to minifb, sized after the last canvas
/// loaded into it.
#[derive(Debug, Default)]
struct Frame {
    pixels: Vec<u32>,
    width: usize,
    height: usize,
}

impl Frame {
    fn load(&mut self, canvas: &Canvas) {
        let (width, height) = (canvas.width() as usize, canvas.height() as usize);
        if (width, height) != (self.width, self.height) {
            self.pixels = vec![0; width * height];
            self.width = width;
            self.height = height;
        }
        canvas.encode(&mut self.pixels);
    }
}

pub struct Viewer {
    window: Window,
    frame: Frame,
}

impl Viewer {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let mut window = Window::new(
            title,
            width as usize,
            height as usize,
            WindowOptions::default(),
        )?;
        window.set_target_fps(60);

        Ok(Self {
            window,
            frame: Frame::default(),
        })
    }

    /// Shows `canvas`. A canvas whose size differs from the window is
    /// stretched to fit.
    pub fn present(&mut self, canvas: &Canvas) -> Result<()> {
        self.frame.load(canvas);
        self.window
            .update_with_buffer(&self.frame.pixels, self.frame.width, self.frame.height)?;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Pointer in window pixels, if it is over the window.
    pub fn pointer(&self) -> Option<[f32; 2]> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| [x, y])
    }

    pub fn command(&self) -> Option<Command> {
        let pressed = |key| self.window.is_key_pressed(key, KeyRepeat::No);

        if pressed(Key::Space) {
            Some(Command::Fill)
        } else if pressed(Key::D) {
            Some(Command::AddDetail)
        } else if pressed(Key::G) {
            Some(Command::Regenerate)
        } else if pressed(Key::S) {
            Some(Command::Stop)
        } else {
            None
        }
    }
}
