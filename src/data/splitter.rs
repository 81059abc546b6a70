// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Shuffles records and splits them into two sets:
//   - Training set:   what the model learns from
//   - Validation set: held out to measure generalisation
//
// Records are split BEFORE tokenisation, so all overflow windows
// of one example land in the same partition. Otherwise nearly
// identical windows would leak from training into validation.
//
// The shuffle is seeded: the same dataset and seed always give
// the same split, so runs are reproducible.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `items` with `seed` and split off `validation_fraction`
/// of them (rounded) as the validation set.
///
/// # Returns
/// A tuple (train, validation)
pub fn split_train_val<T>(
    mut items:           Vec<T>,
    validation_fraction: f64,
    seed:                u64,
) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let total     = items.len();
    let val_count = ((total as f64) * validation_fraction).round() as usize;
    let split_at  = total - val_count.min(total);

    // split_off(n) removes elements [n..] from the Vec and returns them
    let val = items.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        items.len(),
        val.len()
    );

    (items, val)
}
