//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Return the arithmetic mean of the values, or `None` if there are no
/// values to average.
pub fn mean<T, I>(values: I) -> Option<T>
where
    T: Float + std::ops::AddAssign,
    I: IntoIterator<Item = T>
{
    let mut sum = T::from(0).unwrap();
    let mut count = 0usize;

    for value in values {
        sum += value;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    Some(sum / T::from(count).unwrap())
}

pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float + std::ops::Mul + std::ops::Add + std::ops::AddAssign
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}
