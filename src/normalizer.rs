// src/normalizer.rs

#[cfg(feature = "ndarray_backend")]
use ndarray::{Array2, ArrayView1};

use crate::cmvn::{load_cmvn, Block, CmvnStats};
use crate::config::FrontendConfig;
use crate::error::CmvnError;

/// Validated CMVN transform, `y = (x + neg_mean) * inv_std` per dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Cmvn {
    neg_mean: Vec<f32>,
    inv_std: Vec<f32>,
}

impl Cmvn {
    pub fn new(neg_mean: Vec<f32>, inv_std: Vec<f32>) -> Result<Self, CmvnError> {
        if neg_mean.is_empty() {
            return Err(CmvnError::MissingBlock(Block::AddShift));
        }
        if inv_std.is_empty() {
            return Err(CmvnError::MissingBlock(Block::Rescale));
        }
        if neg_mean.len() != inv_std.len() {
            return Err(CmvnError::LengthMismatch {
                neg_mean: neg_mean.len(),
                inv_std: inv_std.len(),
            });
        }
        Ok(Self { neg_mean, inv_std })
    }

    /// Narrows parsed statistics to f32 and checks them against `expected_dim`.
    pub fn from_stats(stats: &CmvnStats, expected_dim: Option<usize>) -> Result<Self, CmvnError> {
        let narrow = |v: &[f64]| v.iter().map(|&x| x as f32).collect::<Vec<f32>>();
        let cmvn = Self::new(narrow(stats.neg_mean.as_slice()), narrow(stats.inv_std.as_slice()))?;

        if let Some(expected) = expected_dim {
            if cmvn.dim() != expected {
                return Err(CmvnError::DimensionMismatch { expected, found: cmvn.dim() });
            }
        }
        Ok(cmvn)
    }

    pub fn from_config(config: &FrontendConfig) -> Result<Self, CmvnError> {
        let path = config.resolved_cmvn_path();
        let stats = load_cmvn(&path)?;
        let cmvn = Self::from_stats(&stats, config.feature_dim)?;
        log::info!("cmvn loaded from {} (dim {})", path.display(), cmvn.dim());
        Ok(cmvn)
    }

    pub fn dim(&self) -> usize {
        self.neg_mean.len()
    }

    pub fn neg_mean(&self) -> &[f32] {
        &self.neg_mean
    }

    pub fn inv_std(&self) -> &[f32] {
        &self.inv_std
    }

    pub fn apply_frame(&self, frame: &mut [f32]) -> Result<(), CmvnError> {
        if frame.len() != self.dim() {
            return Err(CmvnError::FrameLength { expected: self.dim(), found: frame.len() });
        }
        self.normalize(frame);
        Ok(())
    }

    /// Normalizes a row-major buffer of whole frames, returning the frame count.
    pub fn apply(&self, frames: &mut [f32]) -> Result<usize, CmvnError> {
        if frames.len() % self.dim() != 0 {
            return Err(CmvnError::FrameLength { expected: self.dim(), found: frames.len() });
        }
        for frame in frames.chunks_exact_mut(self.dim()) {
            self.normalize(frame);
        }
        Ok(frames.len() / self.dim())
    }

    /// Rows are frames, columns are feature dimensions.
    #[cfg(feature = "ndarray_backend")]
    pub fn apply_array(&self, feats: &mut Array2<f32>) -> Result<(), CmvnError> {
        if feats.ncols() != self.dim() {
            return Err(CmvnError::FrameLength { expected: self.dim(), found: feats.ncols() });
        }
        let neg_mean = ArrayView1::from(self.neg_mean.as_slice());
        let inv_std = ArrayView1::from(self.inv_std.as_slice());

        *feats += &neg_mean;
        *feats *= &inv_std;
        Ok(())
    }

    fn normalize(&self, frame: &mut [f32]) {
        for ((x, &m), &s) in frame.iter_mut().zip(&self.neg_mean).zip(&self.inv_std) {
            *x = (*x + m) * s;
        }
    }
}
