// this_file: crates/gridfont-core/src/atlas.rs

//! Shelf-packed texture atlas for rasterized glyphs.
//!
//! Glyphs are packed left to right into horizontal shelves; a new shelf
//! opens when the current row cannot fit the next glyph. A one pixel
//! border is kept around every region so texture sampling at the edges
//! never bleeds into a neighbor.

use crate::error::{FaceError, Result};

/// Pixel layout of an atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Single channel coverage, one byte per pixel.
    Grayscale,
    /// Premultiplied color, four bytes per pixel.
    Bgra,
}

impl Format {
    pub const fn depth(self) -> usize {
        match self {
            Format::Grayscale => 1,
            Format::Bgra => 4,
        }
    }
}

/// A reserved rectangle inside an atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy)]
struct Shelf {
    y: u32,
    height: u32,
    /// Next free x on this shelf.
    cursor: u32,
}

/// A CPU-side glyph atlas.
#[derive(Debug)]
pub struct Atlas {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: Format,
    shelves: Vec<Shelf>,
    /// y of the first row below all shelves.
    frontier: u32,
}

impl Atlas {
    pub fn new(width: u32, height: u32, format: Format) -> Self {
        Self {
            data: vec![0; width as usize * height as usize * format.depth()],
            width,
            height,
            format,
            shelves: Vec::new(),
            // Row 0 stays blank as the border for the first shelf.
            frontier: 1,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Reserve a `width` x `height` region.
    ///
    /// Zero-area requests succeed with an empty region so callers don't
    /// special-case whitespace glyphs.
    pub fn reserve(&mut self, width: u32, height: u32) -> Result<Region> {
        if width == 0 || height == 0 {
            return Ok(Region::default());
        }
        // One pixel border on each side.
        let padded_w = width + 2;
        let padded_h = height + 2;
        if padded_w > self.width {
            return Err(FaceError::AtlasFull {
                width: self.width,
                height: self.height,
            });
        }

        // Best fit: the open shelf wasting the least height.
        let mut best: Option<usize> = None;
        for (i, shelf) in self.shelves.iter().enumerate() {
            if shelf.height >= padded_h && shelf.cursor + padded_w <= self.width {
                match best {
                    Some(b) if self.shelves[b].height <= shelf.height => {}
                    _ => best = Some(i),
                }
            }
        }

        let (x, y) = if let Some(i) = best {
            let shelf = &mut self.shelves[i];
            let pos = (shelf.cursor, shelf.y);
            shelf.cursor += padded_w;
            pos
        } else {
            if self.frontier + padded_h > self.height {
                return Err(FaceError::AtlasFull {
                    width: self.width,
                    height: self.height,
                });
            }
            let y = self.frontier;
            self.shelves.push(Shelf {
                y,
                height: padded_h,
                cursor: 1 + padded_w,
            });
            self.frontier += padded_h;
            (1, y)
        };

        Ok(Region {
            x: x + 1,
            y: y + 1,
            width,
            height,
        })
    }

    /// Copy `pixels` (tightly packed, `region` sized, atlas format) into
    /// the reserved region.
    pub fn set(&mut self, region: Region, pixels: &[u8]) -> Result<()> {
        let depth = self.format.depth();
        let row_bytes = region.width as usize * depth;
        if pixels.len() < row_bytes * region.height as usize
            || region.x + region.width > self.width
            || region.y + region.height > self.height
        {
            return Err(FaceError::WrongAtlas);
        }
        let stride = self.width as usize * depth;
        for row in 0..region.height as usize {
            let src = &pixels[row * row_bytes..(row + 1) * row_bytes];
            let dst_start = (region.y as usize + row) * stride + region.x as usize * depth;
            self.data[dst_start..dst_start + row_bytes].copy_from_slice(src);
        }
        Ok(())
    }

    /// Drop every reservation and zero the backing store.
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.shelves.clear();
        self.frontier = 1;
    }
}
