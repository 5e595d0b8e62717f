//! Commission and delivery-fee arithmetic.
//!
//! All amounts are integers in the smallest currency unit (FCFA). Commission
//! rates are expressed in basis points so the computation stays in integer
//! math; the result is rounded to the nearest unit, half away from zero.

/// Platform cut on the sale value stream: 3%.
pub const SALE_COMMISSION_BP: i64 = 300;
/// Platform cut on the delivery value stream: 1%.
pub const DELIVERY_COMMISSION_BP: i64 = 100;

/// Flat component of the campus delivery charge.
pub const DELIVERY_BASE_FEE: i64 = 300;
/// Distance component of the campus delivery charge, per kilometre.
pub const DELIVERY_PER_KM_FEE: i64 = 100;

/// `round(amount * rate)` with the rate in basis points.
///
/// Widened to `i128` internally: the product of an extreme (but valid) price
/// and the rate must not wrap. The quotient always fits back into `i64`
/// because the rate is far below 100%.
pub fn commission(amount: i64, rate_bp: i64) -> i64 {
    ((amount as i128 * rate_bp as i128 + 5_000) / 10_000) as i64
}

/// Campus delivery charge: `ceil(base + distance_km * per_km)`.
///
/// The distance is whatever estimate was captured at checkout time; resolving
/// an actual GPS distance is a collaborator concern, not ours.
pub fn delivery_fee(distance_km: f64) -> i64 {
    (DELIVERY_BASE_FEE as f64 + distance_km * DELIVERY_PER_KM_FEE as f64).ceil() as i64
}
