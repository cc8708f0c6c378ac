use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

use std::fmt;

/// Monochrome 64x32 screen. Each cell is 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    screen: [[u8; SCREEN_WIDTH as usize]; SCREEN_HEIGHT as usize],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            screen: [[0; SCREEN_WIDTH as usize]; SCREEN_HEIGHT as usize],
        }
    }

    pub fn clear(&mut self) {
        self.screen = [[0; SCREEN_WIDTH as usize]; SCREEN_HEIGHT as usize];
    }

    /// Whether the pixel at column `x`, row `y` is lit. Off-screen pixels are never lit.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.screen
            .get(y)
            .and_then(|row| row.get(x))
            .is_some_and(|&cell| cell == 1)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.screen.iter().map(|row| row.as_slice())
    }

    pub fn lit_count(&self) -> usize {
        self.screen.iter().flatten().filter(|&&cell| cell == 1).count()
    }

    /// XORs `sprite` onto the screen with its top left corner at (`reg_x`, `reg_y`).
    ///
    /// The origin wraps into the screen, the sprite body is clipped at the right
    /// and bottom edges. Returns true if any lit pixel was switched off.
    pub fn draw(&mut self, reg_x: u8, reg_y: u8, sprite: &[u8]) -> bool {
        let x = reg_x % SCREEN_WIDTH;
        let y = reg_y % SCREEN_HEIGHT;
        let mut did_switch: bool = false;

        for (yo, data) in sprite.iter().enumerate() {
            let row = y as usize + yo;
            if row >= SCREEN_HEIGHT as usize {
                break;
            }

            for (xo, bit) in byte_to_bits(*data).iter().enumerate() {
                let col = x as usize + xo;
                if col >= SCREEN_WIDTH as usize {
                    break;
                }

                if *bit == 1 {
                    if self.screen[row][col] == 1 {
                        did_switch = true;
                    }
                    self.screen[row][col] ^= 1;
                }
            }
        }
        did_switch
    }
}

impl fmt::Display for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.screen {
            let line: String = row
                .iter()
                .map(|&pixel| if pixel == 0 { '░' } else { '█' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Bits as 0 or 1 u8 from the most to least significant
fn byte_to_bits(b: u8) -> [u8; 8] {
    std::array::from_fn(|i| (b >> (7 - i)) & 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_most_significant_first() {
        assert_eq!(byte_to_bits(0b1000_0001), [1, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(byte_to_bits(0xF0), [1, 1, 1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn draw_reports_collision_only_when_a_pixel_turns_off() {
        let mut fb = Framebuffer::new();
        assert!(!fb.draw(0, 0, &[0b1100_0000]));
        assert!(fb.pixel(0, 0));
        assert!(fb.pixel(1, 0));

        // Overlaps only at (1, 0)
        assert!(fb.draw(1, 0, &[0b1000_0000]));
        assert!(fb.pixel(0, 0));
        assert!(!fb.pixel(1, 0));
    }

    #[test]
    fn origin_wraps_but_body_clips() {
        let mut fb = Framebuffer::new();
        // 66 % 64 = 2, 33 % 32 = 1
        fb.draw(66, 33, &[0x80]);
        assert!(fb.pixel(2, 1));

        fb.clear();
        fb.draw(62, 30, &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(fb.lit_count(), 4);
        assert!(fb.pixel(62, 30) && fb.pixel(63, 30) && fb.pixel(62, 31) && fb.pixel(63, 31));
        assert!(!fb.pixel(0, 30));
        assert!(!fb.pixel(62, 0));
    }

    #[test]
    fn rows_expose_raw_cells() {
        let mut fb = Framebuffer::new();
        fb.draw(0, 31, &[0b0100_0000]);
        let rows: Vec<&[u8]> = fb.rows().collect();
        assert_eq!(rows.len(), 32);
        assert_eq!(&rows[31][..3], &[0, 1, 0]);
    }

    #[test]
    fn text_rendering_has_one_line_per_row() {
        let mut fb = Framebuffer::new();
        fb.draw(0, 0, &[0x80]);
        let text = fb.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), SCREEN_HEIGHT as usize);
        assert!(lines[0].starts_with('█'));
        assert_eq!(lines[1].chars().count(), SCREEN_WIDTH as usize);
    }
}
