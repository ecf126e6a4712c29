//! FX utilities - rate arithmetic shared by the resolver

/// Calculate a cross rate from two rates quoted against the same reference
///
/// Example: with EUR as reference, USD/CAD = (EUR→CAD) / (EUR→USD)
///
/// Returns `None` when the denominator is zero.
pub fn cross_rate(quote_to_ref: f64, base_to_ref: f64) -> Option<f64> {
    if base_to_ref == 0.0 {
        return None;
    }
    Some(quote_to_ref / base_to_ref)
}
