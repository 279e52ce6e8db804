use crate::error;
use crate::host::{FlightField, FlightStateAccess};

/// Temporarily overrides a set of fields of host-owned flight state.
///
/// [`Interceptor::engage`] snapshots the fields, writes the computed value into all of them
/// and hands out an [`OverrideGuard`]. Dropping the guard writes the snapshot back, which
/// also happens while unwinding from a panic in the intercepted call.
pub struct Interceptor<'a, S, F>
where
    S: FlightStateAccess + ?Sized,
    F: Fn() -> f64,
{
    target: &'a S,
    fields: &'a [FlightField],
    compute: F,
}

impl<'a, S, F> Interceptor<'a, S, F>
where
    S: FlightStateAccess + ?Sized,
    F: Fn() -> f64,
{
    pub fn new(target: &'a S, fields: &'a [FlightField], compute: F) -> Self {
        Self { target, fields, compute }
    }

    /// Applies the override. Returns `None`, leaving the target untouched, while the
    /// host has no flight state to override.
    pub fn engage(&self) -> Option<OverrideGuard<'a, S>> {
        if !self.target.has_flight_state() {
            return None;
        }
        let snapshot: Vec<_> = self.fields.iter().map(|f| (*f, self.target.try_read(*f))).collect();
        let value = (self.compute)();
        let guard = OverrideGuard { target: self.target, snapshot, value };
        for field in self.fields {
            if let Err(e) = self.target.write(*field, Some(value)) {
                error!("Could not override {field}: {e}");
            }
        }
        Some(guard)
    }
}

/// Scope of an active override, see [`Interceptor`].
#[must_use = "dropping the guard restores the original values immediately"]
pub struct OverrideGuard<'a, S>
where
    S: FlightStateAccess + ?Sized,
{
    target: &'a S,
    snapshot: Vec<(FlightField, Option<f64>)>,
    value: f64,
}

impl<S> OverrideGuard<'_, S>
where
    S: FlightStateAccess + ?Sized,
{
    /// The value written into every overridden field.
    pub fn value(&self) -> f64 { self.value }

    /// The values the fields held when the override was applied.
    pub fn snapshot(&self) -> &[(FlightField, Option<f64>)] { &self.snapshot }

    /// Ends the override now instead of at scope end.
    pub fn restore(self) { drop(self); }
}

impl<S> Drop for OverrideGuard<'_, S>
where
    S: FlightStateAccess + ?Sized,
{
    fn drop(&mut self) {
        for (field, original) in self.snapshot.iter().rev() {
            if let Err(e) = self.target.write(*field, *original) {
                error!("Could not restore {field} to {original:?}: {e}");
            }
        }
    }
}
