//! Draw surface abstraction
//!
//! The core never looks at pixels. It issues ordered blit and text calls
//! against whatever target the host provides.

/// Host-side sprite name; the host maps it to loaded images
pub type SpriteId = &'static str;

pub trait Surface {
    fn blit(&mut self, sprite: SpriteId, frame: u16, x: i32, y: i32);
    fn text(&mut self, text: &str, x: i32, y: i32);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Blit {
        sprite: SpriteId,
        frame: u16,
        x: i32,
        y: i32,
    },
    Text {
        text: String,
        x: i32,
        y: i32,
    },
}

/// Records draw calls in order (headless runs and tests)
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            DrawCall::Blit { .. } => None,
        })
    }

    pub fn blits(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Blit { .. }))
            .count()
    }
}

impl Surface for DrawList {
    fn blit(&mut self, sprite: SpriteId, frame: u16, x: i32, y: i32) {
        self.calls.push(DrawCall::Blit { sprite, frame, x, y });
    }

    fn text(&mut self, text: &str, x: i32, y: i32) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
        });
    }
}
