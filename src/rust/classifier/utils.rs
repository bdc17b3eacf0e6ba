use ndarray::{Array1, ArrayView1};

pub(crate) fn l2_normalize(vec: &Array1<f32>) -> Array1<f32> {
    let norm: f32 = vec.iter().map(|&x| x * x).sum::<f32>().sqrt();
    if norm > 1e-10 {
        vec / norm
    } else {
        Array1::zeros(vec.len())
    }
}

pub(crate) fn l1_normalize(vec: &Array1<f32>) -> Array1<f32> {
    let norm: f32 = vec.iter().map(|x| x.abs()).sum();
    if norm > 1e-10 {
        vec / norm
    } else {
        Array1::zeros(vec.len())
    }
}

pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Numerically stable softmax: shifts by the row maximum before exponentiating.
pub(crate) fn softmax(scores: ArrayView1<f32>) -> Array1<f32> {
    let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp = scores.mapv(|s| (s - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Index of the first maximum, mirroring numpy's `argmax` tie-breaking.
pub(crate) fn argmax(scores: ArrayView1<f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}
