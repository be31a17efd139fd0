//! Carrying capacity of wagons and units.
//!
//! Quantities elsewhere are always in the station's native unit (pieces for
//! items, volume for fluids). This is the only place that converts between
//! those and wagon slots.

use crate::catalog::ItemCatalog;
use crate::config::ControllerConfig;
use crate::signal::ResourceSignal;

/// Capacity rules derived from the controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityModel {
    pub default_slots: u32,
    pub fluid_capacity: i64,
    pub limiter_margin: u32,
}

impl Default for CapacityModel {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}

impl CapacityModel {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            default_slots: config.default_wagon_slots,
            fluid_capacity: config.fluid_wagon_capacity,
            limiter_margin: config.limiter_margin_slots,
        }
    }

    /// Capacity of one wagon load of `signal`, using `slots` when set and
    /// positive, the default slot count otherwise.
    pub fn wagon_capacity<C: ItemCatalog + ?Sized>(
        &self,
        catalog: &C,
        signal: &ResourceSignal,
        slots: Option<u32>,
    ) -> i64 {
        match signal {
            ResourceSignal::Item(name) => {
                let slots = slots.filter(|&s| s > 0).unwrap_or(self.default_slots);
                i64::from(catalog.stack_size(name).max(1)) * i64::from(slots)
            }
            ResourceSignal::Fluid(_) => self.fluid_capacity,
            ResourceSignal::Virtual(_) => 0,
        }
    }

    /// Effective slot count of a unit given its limiter setting.
    pub fn unit_slots(&self, limiter: Option<u32>) -> u32 {
        limiter.unwrap_or(self.default_slots)
    }

    /// What a unit with the given limiter can carry of `signal`.
    pub fn unit_capacity<C: ItemCatalog + ?Sized>(
        &self,
        catalog: &C,
        limiter: Option<u32>,
        signal: &ResourceSignal,
    ) -> i64 {
        self.wagon_capacity(catalog, signal, Some(self.unit_slots(limiter)))
    }

    /// Limiter setting that loads exactly `quantity` of an item plus the
    /// configured margin. Fluids (and virtual signals) load unrestricted.
    pub fn limiter_for<C: ItemCatalog + ?Sized>(
        &self,
        catalog: &C,
        signal: &ResourceSignal,
        quantity: i64,
    ) -> Option<u32> {
        match signal {
            ResourceSignal::Item(name) => {
                let stack = u64::from(catalog.stack_size(name).max(1));
                let quantity = u64::try_from(quantity).unwrap_or(0);
                let slots = quantity.div_ceil(stack) + u64::from(self.limiter_margin);
                Some(u32::try_from(slots).unwrap_or(u32::MAX))
            }
            ResourceSignal::Fluid(_) | ResourceSignal::Virtual(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemTable;

    fn catalog() -> ItemTable {
        ItemTable::builder()
            .item("iron-plate", 100)
            .unstackable("rail-car")
            .build()
            .unwrap()
    }

    #[test]
    fn item_capacity_uses_default_slots() {
        let model = CapacityModel::default();
        let cap = model.wagon_capacity(&catalog(), &ResourceSignal::item("iron-plate"), None);
        assert_eq!(cap, 4000);
    }

    #[test]
    fn item_capacity_honors_slot_override() {
        let model = CapacityModel::default();
        let cap = model.wagon_capacity(&catalog(), &ResourceSignal::item("iron-plate"), Some(10));
        assert_eq!(cap, 1000);
    }

    #[test]
    fn zero_slot_override_falls_back_to_default() {
        let model = CapacityModel::default();
        let cap = model.wagon_capacity(&catalog(), &ResourceSignal::item("iron-plate"), Some(0));
        assert_eq!(cap, 4000);
    }

    #[test]
    fn unstackable_item_is_one_per_slot() {
        let model = CapacityModel::default();
        let cap = model.wagon_capacity(&catalog(), &ResourceSignal::item("rail-car"), None);
        assert_eq!(cap, 40);
    }

    #[test]
    fn fluid_capacity_ignores_slots() {
        let model = CapacityModel::default();
        let water = ResourceSignal::fluid("water");
        assert_eq!(model.wagon_capacity(&catalog(), &water, Some(3)), 25_000);
        assert_eq!(model.wagon_capacity(&catalog(), &water, None), 25_000);
    }

    #[test]
    fn virtual_signal_is_never_transportable() {
        let model = CapacityModel::default();
        let marker = ResourceSignal::virtual_signal("signal-D");
        assert_eq!(model.wagon_capacity(&catalog(), &marker, None), 0);
    }

    #[test]
    fn unit_capacity_reads_limiter() {
        let model = CapacityModel::default();
        let plate = ResourceSignal::item("iron-plate");
        assert_eq!(model.unit_slots(None), 40);
        assert_eq!(model.unit_capacity(&catalog(), Some(41), &plate), 4100);
        assert_eq!(model.unit_capacity(&catalog(), None, &plate), 4000);
    }

    #[test]
    fn limiter_rounds_up_and_adds_margin() {
        let model = CapacityModel::default();
        let plate = ResourceSignal::item("iron-plate");
        assert_eq!(model.limiter_for(&catalog(), &plate, 4000), Some(41));
        assert_eq!(model.limiter_for(&catalog(), &plate, 4001), Some(42));
        assert_eq!(model.limiter_for(&catalog(), &plate, 1), Some(2));
    }

    #[test]
    fn fluid_loads_unrestricted() {
        let model = CapacityModel::default();
        assert_eq!(
            model.limiter_for(&catalog(), &ResourceSignal::fluid("water"), 25_000),
            None
        );
    }
}
