//! Empirical hit rates over a recent observation window
//!
//! Both calculators are pure functions of their inputs. Neither ever fails: a
//! metric that never appears in a sequence, an empty sequence, and an entity
//! that never hits all resolve to `0.0`. A zero here means "no evidence",
//! not "confirmed zero".

use crate::config::TrackedProp;
use crate::observation::ObservationSequence;

/// Fraction of records whose tracked metric strictly exceeds its threshold
///
/// Returns `0.0` when the metric is absent from every record (including the
/// empty sequence). Records that lack the metric count as misses.
///
/// # Example
/// ```
/// use coprop::config::TrackedProp;
/// use coprop::hit_rate::hit_rate;
/// use coprop::observation::ObservationSequence;
///
/// let logs = ObservationSequence::from_metric("PTS", &[30.0, 22.0, 27.0, 25.5]);
/// let prop = TrackedProp::new("LeBron James", "PTS", 25.5);
/// assert_eq!(hit_rate(&logs, &prop), 0.5);
/// ```
pub fn hit_rate(sequence: &ObservationSequence, prop: &TrackedProp) -> f64 {
    if !sequence.has_metric(&prop.metric) {
        tracing::debug!("{}: metric {} never observed", prop.entity, prop.metric);
        return 0.0;
    }

    let hits = sequence.hits(prop);
    let count = hits.iter().filter(|&&h| h).count();
    count as f64 / hits.len() as f64
}

/// P(`second` hits | `first` hits), pairing records by recency index
///
/// Record `i` of `first_seq` is paired with record `i` of `second_seq`. When
/// the sequences differ in length, positions past the shorter one contribute
/// to the denominator (hits of `first`) but never to the numerator.
///
/// Returns `0.0` when either metric is absent from its sequence, or when
/// `first` never hits in its window.
pub fn conditional_co_occurrence(
    first_seq: &ObservationSequence,
    first: &TrackedProp,
    second_seq: &ObservationSequence,
    second: &TrackedProp,
) -> f64 {
    if !first_seq.has_metric(&first.metric) || !second_seq.has_metric(&second.metric) {
        return 0.0;
    }

    let first_hits = first_seq.hits(first);
    let second_hits = second_seq.hits(second);

    let conditioning = first_hits.iter().filter(|&&h| h).count();
    if conditioning == 0 {
        tracing::debug!(
            "{}: no hits in window, co-occurrence with {} defaults to 0",
            first.entity,
            second.entity
        );
        return 0.0;
    }

    let joint = first_hits
        .iter()
        .zip(second_hits.iter())
        .filter(|&(&a, &b)| a && b)
        .count();

    joint as f64 / conditioning as f64
}
