//! Accuracy metrics for node classification.
//!
//! Labels use `NaN` as the unlabeled sentinel: any row whose true value does
//! not compare equal to itself is excluded from that column's accuracy.

use candle_core::{D, DType, Tensor};

use crate::error::{KarasuError, Result};

/// Mean per-column accuracy of `y_pred` against `y_true`.
///
/// Both tensors must share a `(rows, cols)` shape. For each column, rows with
/// a `NaN` true value are excluded; among the remaining rows the fraction of
/// exact matches is computed. The result is the unweighted mean over columns.
///
/// Every column must have at least one labeled row, otherwise its accuracy is
/// undefined and an error is returned.
pub fn accuracy(y_true: &Tensor, y_pred: &Tensor) -> Result<f32> {
    let truth_dims = y_true.dims2()?;
    let pred_dims = y_pred.dims2()?;
    if truth_dims != pred_dims {
        return Err(KarasuError::ShapeMismatch {
            truth: truth_dims,
            pred: pred_dims,
        });
    }
    let (rows, cols) = truth_dims;
    if rows == 0 || cols == 0 {
        return Err(KarasuError::EmptyMatrix);
    }

    let truth = y_true.to_dtype(DType::F32)?.to_vec2::<f32>()?;
    let pred = y_pred.to_dtype(DType::F32)?.to_vec2::<f32>()?;

    let mut acc_sum = 0f32;
    for col in 0..cols {
        let mut labeled = 0usize;
        let mut correct = 0usize;
        for row in 0..rows {
            let t = truth[row][col];
            if t.is_nan() {
                continue;
            }
            labeled += 1;
            if t == pred[row][col] {
                correct += 1;
            }
        }
        if labeled == 0 {
            return Err(KarasuError::NoLabeledRows { col });
        }
        acc_sum += correct as f32 / labeled as f32;
    }

    Ok(acc_sum / cols as f32)
}

/// Accuracy of raw `(rows, n_class)` logits against a per-row label vector.
///
/// Takes the argmax class per row and compares it to `labels` (`f32`, `NaN`
/// for unlabeled rows). This is the evaluator injected into the trainer.
pub fn logits_accuracy(logits: &Tensor, labels: &Tensor) -> Result<f32> {
    let (rows, _n_class) = logits.dims2()?;
    let pred = logits
        .argmax(D::Minus1)?
        .to_dtype(DType::F32)?
        .reshape((rows, 1))?;
    let truth = labels.to_dtype(DType::F32)?.reshape((rows, 1))?;
    accuracy(&truth, &pred)
}
