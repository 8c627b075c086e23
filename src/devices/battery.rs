/// Nominal home battery capacity in kWh.
pub const DEFAULT_CAPACITY_KWH: f64 = 13.5;

/// Level the battery starts a scenario at, in kWh (about half full).
pub const DEFAULT_INITIAL_LEVEL_KWH: f64 = 6.5;

/// A home battery with a bounded stored energy level.
///
/// `Battery` is a small `Copy` state value: each hourly transition consumes
/// the previous state and returns the next one, so a scenario run folds it
/// over the hour sequence instead of mutating shared storage.
///
/// Surplus beyond `capacity_kwh` is curtailed and deficit beyond the stored
/// energy is left unmet; neither is stored in the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Battery {
    /// Usable capacity in kilowatt-hours.
    capacity_kwh: f64,

    /// Stored energy in kilowatt-hours, always in `[0, capacity_kwh]`.
    level_kwh: f64,
}

impl Battery {
    /// Creates a battery with the given capacity and starting level.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is not positive and finite, or the starting
    /// level is outside `[0, capacity_kwh]`.
    pub fn new(capacity_kwh: f64, initial_level_kwh: f64) -> Self {
        assert!(capacity_kwh.is_finite() && capacity_kwh > 0.0);
        assert!((0.0..=capacity_kwh).contains(&initial_level_kwh));
        Self {
            capacity_kwh,
            level_kwh: initial_level_kwh,
        }
    }

    /// Usable capacity in kWh.
    pub fn capacity_kwh(&self) -> f64 {
        self.capacity_kwh
    }

    /// Stored energy in kWh.
    pub fn level_kwh(&self) -> f64 {
        self.level_kwh
    }

    /// Stored energy as a fraction of capacity.
    pub fn soc(&self) -> f64 {
        self.level_kwh / self.capacity_kwh
    }

    /// Applies one hour of production and consumption and returns the new state.
    ///
    /// A surplus charges up to capacity, a deficit discharges down to zero.
    pub fn step(self, production_kwh: f64, consumption_kwh: f64) -> Self {
        let balance = production_kwh - consumption_kwh;
        let level_kwh = if balance >= 0.0 {
            self.capacity_kwh.min(self.level_kwh + balance)
        } else {
            (self.level_kwh + balance).max(0.0)
        };
        Self { level_kwh, ..self }
    }
}

impl Default for Battery {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY_KWH, DEFAULT_INITIAL_LEVEL_KWH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_battery() {
        let battery = Battery::new(13.5, 6.5);
        assert_eq!(battery.capacity_kwh(), 13.5);
        assert_eq!(battery.level_kwh(), 6.5);
        assert!((battery.soc() - 6.5 / 13.5).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn test_invalid_capacity() {
        Battery::new(0.0, 0.0);
    }

    #[test]
    #[should_panic]
    fn test_initial_level_above_capacity() {
        Battery::new(10.0, 10.5);
    }

    #[test]
    #[should_panic]
    fn test_negative_initial_level() {
        Battery::new(10.0, -0.1);
    }

    #[test]
    fn test_surplus_charges() {
        let b = Battery::new(10.0, 2.0).step(3.0, 1.0);
        assert_eq!(b.level_kwh(), 4.0);
    }

    #[test]
    fn test_deficit_discharges() {
        let b = Battery::new(10.0, 5.0).step(0.5, 2.0);
        assert_eq!(b.level_kwh(), 3.5);
    }

    #[test]
    fn test_surplus_beyond_capacity_is_curtailed() {
        let b = Battery::new(10.0, 9.0).step(5.0, 0.0);
        assert_eq!(b.level_kwh(), 10.0);
    }

    #[test]
    fn test_deficit_beyond_charge_is_unmet() {
        let b = Battery::new(10.0, 1.0).step(0.0, 4.0);
        assert_eq!(b.level_kwh(), 0.0);
    }

    #[test]
    fn test_zero_balance_keeps_level() {
        let b = Battery::new(10.0, 4.2).step(1.3, 1.3);
        assert_eq!(b.level_kwh(), 4.2);
    }

    #[test]
    fn test_level_never_exceeds_capacity_after_steps() {
        let mut b = Battery::new(1.0, 0.6);
        for (prod, cons) in [(0.0, 0.1), (5.0, 0.0), (0.0, 0.3), (0.2, 0.0)] {
            b = b.step(prod, cons);
            assert!((0.0..=b.capacity_kwh()).contains(&b.level_kwh()));
        }
        assert_eq!(b.capacity_kwh(), 1.0);
    }

    #[test]
    fn test_boundaries_are_not_errors() {
        let mut b = Battery::new(10.0, 0.0);
        b = b.step(0.0, 1.0);
        assert_eq!(b.level_kwh(), 0.0);
        b = b.step(20.0, 0.0);
        assert_eq!(b.level_kwh(), 10.0);
        b = b.step(1.0, 0.0);
        assert_eq!(b.level_kwh(), 10.0);
    }
}
