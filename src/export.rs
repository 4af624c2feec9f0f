//! Previews and raw dumps of synthesis output.
//!
//! The weight buffer itself is the product; these writers only exist so the
//! result can be inspected or handed to tools that read files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, Luma, Rgb, RgbImage};

use crate::tilemap::Tilemap;
use crate::weight_buffer::WeightBuffer;

/// Preview colors for the first layers; later layers reuse them.
const LAYER_COLORS: [[u8; 3]; 8] = [
    [222, 200, 150], // sand
    [230, 110, 120], // coral
    [110, 110, 115], // rock
    [95, 75, 50],    // mud
    [60, 140, 90],   // seagrass
    [40, 60, 120],   // abyss
    [200, 200, 210], // shell
    [150, 90, 160],  // anemone
];

/// Characters for ASCII dumps, one per layer index.
const LAYER_CHARS: &[u8] = b".~#%\"@*+";

pub fn layer_color(layer: usize) -> [u8; 3] {
    LAYER_COLORS[layer % LAYER_COLORS.len()]
}

pub fn layer_char(layer: usize) -> char {
    LAYER_CHARS[layer % LAYER_CHARS.len()] as char
}

/// Blend each cell's layer colors by weight.
pub fn splat_preview(buffer: &WeightBuffer) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(buffer.width as u32, buffer.height as u32);
    for y in 0..buffer.height {
        for x in 0..buffer.width {
            let mut rgb = [0.0f32; 3];
            for (layer, &w) in buffer.cell(x, y).iter().enumerate() {
                let c = layer_color(layer);
                for i in 0..3 {
                    rgb[i] += c[i] as f32 * w;
                }
            }
            let px = [
                rgb[0].round().clamp(0.0, 255.0) as u8,
                rgb[1].round().clamp(0.0, 255.0) as u8,
                rgb[2].round().clamp(0.0, 255.0) as u8,
            ];
            img.put_pixel(x as u32, y as u32, Rgb(px));
        }
    }
    img
}

/// Save the blended color preview as PNG.
pub fn export_splat_preview(buffer: &WeightBuffer, path: &Path) -> Result<(), image::ImageError> {
    splat_preview(buffer).save(path)
}

/// Save one layer as an 8-bit grayscale mask.
pub fn export_layer_mask(buffer: &WeightBuffer, layer: usize, path: &Path) -> Result<(), image::ImageError> {
    let map = buffer.layer_map(layer);
    let mut img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::new(map.width as u32, map.height as u32);
    for (x, y, &w) in map.iter() {
        img.put_pixel(x as u32, y as u32, Luma([(w.clamp(0.0, 1.0) * 255.0).round() as u8]));
    }
    img.save(path)
}

/// Save a [0, 1] heightmap as 16-bit grayscale PNG.
pub fn export_heightmap(heights: &Tilemap<f32>, path: &Path) -> Result<(), image::ImageError> {
    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(heights.width as u32, heights.height as u32);
    for (x, y, &h) in heights.iter() {
        img.put_pixel(x as u32, y as u32, Luma([(h.clamp(0.0, 1.0) * 65535.0).round() as u16]));
    }
    img.save(path)
}

/// Dump the buffer as little-endian f32 in its native `[y][x][layer]` order.
pub fn export_weights_raw(buffer: &WeightBuffer, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_weights_raw(buffer, &mut writer)?;
    writer.flush()
}

pub fn write_weights_raw<W: Write>(buffer: &WeightBuffer, writer: &mut W) -> io::Result<()> {
    for &w in buffer.as_slice() {
        writer.write_all(&w.to_le_bytes())?;
    }
    Ok(())
}

/// Dominant layer per cell as text, one line per row.
pub fn ascii_map(buffer: &WeightBuffer) -> String {
    let dominant = buffer.dominant_layers();
    let mut out = String::with_capacity((buffer.width + 1) * buffer.height);
    for y in 0..buffer.height {
        for x in 0..buffer.width {
            out.push(layer_char(*dominant.get(x, y)));
        }
        out.push('\n');
    }
    out
}
