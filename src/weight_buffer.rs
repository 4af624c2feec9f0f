//! Dense per-cell, per-layer blend weights produced by synthesis.

use crate::tilemap::Tilemap;

/// `width × height × layers` weights, laid out `[(y * width + x) * layers + layer]`.
///
/// Each cell's slice is ready to copy into a host alpha map as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightBuffer {
    pub width: usize,
    pub height: usize,
    pub layers: usize,
    data: Vec<f32>,
}

impl WeightBuffer {
    /// Zero-filled buffer.
    pub fn new(width: usize, height: usize, layers: usize) -> Self {
        Self {
            width,
            height,
            layers,
            data: vec![0.0; width * height * layers],
        }
    }

    /// Weight of `layer` at cell `(x, y)`.
    pub fn get(&self, x: usize, y: usize, layer: usize) -> f32 {
        self.data[self.offset(x, y) + layer]
    }

    /// All layer weights of one cell.
    pub fn cell(&self, x: usize, y: usize) -> &[f32] {
        let start = self.offset(x, y);
        &self.data[start..start + self.layers]
    }

    pub fn cell_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        let start = self.offset(x, y);
        &mut self.data[start..start + self.layers]
    }

    pub fn cell_sum(&self, x: usize, y: usize) -> f32 {
        self.cell(x, y).iter().sum()
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.layers
    }

    /// Number of floats in one row of cells.
    pub fn row_stride(&self) -> usize {
        self.width * self.layers
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Largest deviation of any cell's layer sum from 1.
    pub fn max_sum_error(&self) -> f32 {
        if self.layers == 0 {
            return 0.0;
        }
        self.data
            .chunks_exact(self.layers)
            .map(|cell| (cell.iter().sum::<f32>() - 1.0).abs())
            .fold(0.0, f32::max)
    }

    /// One layer as its own map.
    pub fn layer_map(&self, layer: usize) -> Tilemap<f32> {
        let mut map = Tilemap::<f32>::new(self.width, self.height);
        if layer >= self.layers {
            return map;
        }
        for (x, y, v) in map.iter_mut() {
            *v = self.data[(y * self.width + x) * self.layers + layer];
        }
        map
    }

    /// Index of the heaviest layer per cell; ties go to the lower index.
    pub fn dominant_layers(&self) -> Tilemap<usize> {
        let mut map = Tilemap::<usize>::new(self.width, self.height);
        if self.layers == 0 {
            return map;
        }
        for (x, y, v) in map.iter_mut() {
            let cell = &self.data[(y * self.width + x) * self.layers..][..self.layers];
            let mut best = 0;
            for (i, &w) in cell.iter().enumerate() {
                if w > cell[best] {
                    best = i;
                }
            }
            *v = best;
        }
        map
    }

    /// Mean weight of each layer over all cells.
    pub fn layer_coverage(&self) -> Vec<f32> {
        let mut totals = vec![0.0f64; self.layers];
        if self.layers == 0 {
            return Vec::new();
        }
        for cell in self.data.chunks_exact(self.layers) {
            for (t, &w) in totals.iter_mut().zip(cell) {
                *t += w as f64;
            }
        }
        let cells = (self.width * self.height).max(1) as f64;
        totals.into_iter().map(|t| (t / cells) as f32).collect()
    }
}
