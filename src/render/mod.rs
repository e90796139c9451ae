use crate::{
    config,
    types::{ColorId, FallingWord, ScoreMarker},
};

#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// Draw order. Later layers win the cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Word,
    Marker,
    Player,
}

#[derive(Clone, Copy, Debug)]
pub struct RenderCell {
    pub ch: char,
    pub color: ColorId,
    pub layer: Layer,
}

const EMPTY_CELL: RenderCell = RenderCell {
    ch: ' ',
    color: ColorId::White,
    layer: Layer::Background,
};

#[derive(Debug)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<RenderCell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let mut buffer = Self {
            width,
            height,
            cells: Vec::new(),
        };
        buffer.resize(width, height);
        buffer
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let len = (width as usize).saturating_mul(height as usize);
        if self.cells.len() != len {
            self.cells.resize(len, EMPTY_CELL);
        }
        self.clear();
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = EMPTY_CELL;
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> RenderCell {
        debug_assert!(x < self.width && y < self.height, "get() out of bounds");
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.cells[idx]
    }

    fn set(&mut self, x: u16, y: u16, ch: char, color: ColorId, layer: Layer) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        let cell = &mut self.cells[idx];
        if layer >= cell.layer {
            *cell = RenderCell { ch, color, layer };
        }
    }
}

/// Rasterize the playfield: lane guides, the catch line, falling words,
/// score markers and the player avatar.
pub fn draw(
    words: &[FallingWord],
    markers: &[ScoreMarker],
    player_lane: usize,
    lane_count: usize,
    viewport: Viewport,
    frame: &mut FrameBuffer,
) {
    if frame.width() != viewport.width || frame.height() != viewport.height {
        frame.resize(viewport.width, viewport.height);
    } else {
        frame.clear();
    }
    if viewport.width == 0 || viewport.height == 0 || lane_count == 0 {
        return;
    }

    for boundary in 1..lane_count {
        let x = (boundary * viewport.width as usize / lane_count) as u16;
        for y in 0..viewport.height {
            frame.set(x, y, '·', ColorId::Gray, Layer::Background);
        }
    }

    let catch_row = field_row(config::CATCH_BAND_TOP, viewport.height);
    if (0..viewport.height as i32).contains(&catch_row) {
        for x in 0..viewport.width {
            frame.set(x, catch_row as u16, '┄', ColorId::Gray, Layer::Background);
        }
    }

    for word in words {
        let row = field_row(word.y, viewport.height);
        if row < 0 || row >= viewport.height as i32 {
            continue;
        }
        let color = if !word.consumed {
            ColorId::White
        } else if word.is_target {
            ColorId::Green
        } else {
            ColorId::Red
        };
        draw_centered(
            frame,
            word.text,
            lane_center(word.lane, lane_count, viewport.width),
            row as u16,
            color,
            Layer::Word,
        );
    }

    for marker in markers {
        let row = field_row(marker.y, viewport.height);
        if row < 0 || row >= viewport.height as i32 {
            continue;
        }
        let (sign, color) = if marker.positive {
            ('+', ColorId::Green)
        } else {
            ('-', ColorId::Red)
        };
        let text = format!("{sign}{}", marker.delta);
        draw_centered(
            frame,
            &text,
            lane_center(marker.lane, lane_count, viewport.width),
            row as u16,
            color,
            Layer::Marker,
        );
    }

    let player_row = field_row(config::PLAYER_ROW, viewport.height);
    if (0..viewport.height as i32).contains(&player_row) {
        frame.set(
            lane_center(player_lane, lane_count, viewport.width),
            player_row as u16,
            '▲',
            ColorId::Cyan,
            Layer::Player,
        );
    }
}

fn lane_center(lane: usize, lane_count: usize, width: u16) -> u16 {
    ((2 * lane + 1) * width as usize / (2 * lane_count)) as u16
}

fn field_row(y: f32, height: u16) -> i32 {
    if height == 0 {
        return -1;
    }
    (y / config::FIELD_ROWS * (height - 1) as f32).round() as i32
}

fn draw_centered(
    frame: &mut FrameBuffer,
    text: &str,
    center_x: u16,
    row: u16,
    color: ColorId,
    layer: Layer,
) {
    let len = text.chars().count() as i32;
    let start = center_x as i32 - len / 2;
    for (i, ch) in text.chars().enumerate() {
        let x = start + i as i32;
        if x < 0 || x >= frame.width() as i32 {
            continue;
        }
        frame.set(x as u16, row, ch, color, layer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WordId;

    const VIEW: Viewport = Viewport {
        width: 60,
        height: 20,
    };

    fn make_word(text: &'static str, lane: usize, y: f32) -> FallingWord {
        FallingWord {
            id: 1 as WordId,
            catalog_index: 0,
            text,
            is_target: true,
            lane,
            y,
            consumed: false,
            linger_ms: 0,
        }
    }

    mod framebuffer {
        use super::*;

        #[test]
        fn creates_with_correct_dimensions() {
            let fb = FrameBuffer::new(80, 24);
            assert_eq!(fb.width(), 80);
            assert_eq!(fb.height(), 24);
        }

        #[test]
        fn resize_clears_cells() {
            let mut fb = FrameBuffer::new(10, 10);
            fb.set(5, 5, 'A', ColorId::Yellow, Layer::Word);
            fb.resize(10, 10);
            assert_eq!(fb.get(5, 5).ch, ' ');
        }

        #[test]
        fn higher_layer_wins_the_cell() {
            let mut fb = FrameBuffer::new(10, 10);
            fb.set(5, 5, 'w', ColorId::White, Layer::Word);
            fb.set(5, 5, '·', ColorId::Gray, Layer::Background);
            assert_eq!(fb.get(5, 5).ch, 'w');
            fb.set(5, 5, '▲', ColorId::Cyan, Layer::Player);
            assert_eq!(fb.get(5, 5).ch, '▲');
        }

        #[test]
        fn out_of_bounds_set_is_ignored() {
            let mut fb = FrameBuffer::new(10, 10);
            fb.set(100, 100, 'X', ColorId::White, Layer::Word);
        }
    }

    mod draw_fn {
        use super::*;

        #[test]
        fn empty_playfield_has_lane_guides_and_catch_line() {
            let mut frame = FrameBuffer::new(VIEW.width, VIEW.height);
            draw(&[], &[], 1, 3, VIEW, &mut frame);

            let guide_x = (VIEW.width / 3) as u16;
            assert_eq!(frame.get(guide_x, 0).ch, '·');

            let catch_row = field_row(crate::config::CATCH_BAND_TOP, VIEW.height) as u16;
            assert_eq!(frame.get(0, catch_row).ch, '┄');
        }

        #[test]
        fn word_is_centered_in_its_lane() {
            let mut frame = FrameBuffer::new(VIEW.width, VIEW.height);
            let word = make_word("cat", 0, 10.0);
            draw(&[word], &[], 1, 3, VIEW, &mut frame);

            let row = field_row(10.0, VIEW.height) as u16;
            let center = lane_center(0, 3, VIEW.width);
            assert_eq!(frame.get(center, row).ch, 'a');
            assert_eq!(frame.get(center - 1, row).ch, 'c');
            assert_eq!(frame.get(center + 1, row).ch, 't');
            assert_eq!(frame.get(center, row).color, ColorId::White);
        }

        #[test]
        fn caught_words_flash_green_or_red() {
            let mut frame = FrameBuffer::new(VIEW.width, VIEW.height);
            let mut target = make_word("cat", 0, 10.0);
            target.consumed = true;
            let mut distractor = make_word("cake", 2, 10.0);
            distractor.is_target = false;
            distractor.consumed = true;
            draw(&[target, distractor], &[], 1, 3, VIEW, &mut frame);

            let row = field_row(10.0, VIEW.height) as u16;
            assert_eq!(frame.get(lane_center(0, 3, VIEW.width), row).color, ColorId::Green);
            assert_eq!(frame.get(lane_center(2, 3, VIEW.width), row).color, ColorId::Red);
        }

        #[test]
        fn player_sits_on_the_player_row() {
            let mut frame = FrameBuffer::new(VIEW.width, VIEW.height);
            draw(&[], &[], 2, 3, VIEW, &mut frame);
            let row = field_row(crate::config::PLAYER_ROW, VIEW.height) as u16;
            let cell = frame.get(lane_center(2, 3, VIEW.width), row);
            assert_eq!(cell.ch, '▲');
            assert_eq!(cell.color, ColorId::Cyan);
        }

        #[test]
        fn marker_overrides_a_word_in_the_same_cell() {
            let mut frame = FrameBuffer::new(VIEW.width, VIEW.height);
            let word = make_word("cat", 1, 20.0);
            let marker = ScoreMarker {
                delta: 5,
                positive: true,
                lane: 1,
                y: 20.0,
                ttl_ms: 500,
            };
            draw(&[word], &[marker], 1, 3, VIEW, &mut frame);

            let row = field_row(20.0, VIEW.height) as u16;
            let center = lane_center(1, 3, VIEW.width);
            assert_eq!(frame.get(center, row).ch, '5');
            assert_eq!(frame.get(center, row).color, ColorId::Green);
        }

        #[test]
        fn zero_sized_viewport_does_not_panic() {
            let mut frame = FrameBuffer::new(0, 0);
            let view = Viewport {
                width: 0,
                height: 0,
            };
            draw(&[], &[], 0, 3, view, &mut frame);
        }
    }
}
