use tracing::{debug, info, warn};

use crate::error::{InventoryError, Result};
use crate::models::{Boat, Money};

use super::codec::decode_strict;

/// How many boats the marina tracks unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 120;

/// Outcome of an accepted payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub name: String,
    pub paid: Money,
    pub remaining: Money,
}

/// The ordered, capacity-bounded collection of boats held in memory. Order is
/// insertion order until `sort_by_name` runs; later additions append at the
/// end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    boats: Vec<Boat>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            boats: Vec::new(),
            capacity,
        }
    }

    pub fn boats(&self) -> &[Boat] {
        &self.boats
    }

    pub fn iter(&self) -> impl Iterator<Item = &Boat> {
        self.boats.iter()
    }

    pub fn len(&self) -> usize {
        self.boats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boats.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.boats.len() >= self.capacity
    }

    /// First boat whose name matches case-insensitively.
    pub fn find(&self, name: &str) -> Option<&Boat> {
        self.boats.iter().find(|boat| boat.matches_name(name))
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.boats
            .iter()
            .position(|boat| boat.matches_name(name))
            .ok_or_else(|| InventoryError::NotFound {
                name: name.to_string(),
            })
    }

    /// Append a boat without validating its fields. Only the capacity bound is
    /// enforced; the loader relies on this to keep damaged rows.
    pub fn push(&mut self, boat: Boat) -> Result<()> {
        if self.is_full() {
            return Err(InventoryError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.boats.push(boat);
        Ok(())
    }

    /// Validate a user-entered record and append it. Nothing changes when the
    /// record is rejected.
    pub fn add_record(&mut self, line: &str) -> Result<&Boat> {
        if self.is_full() {
            warn!(capacity = self.capacity, "rejected boat: inventory full");
            return Err(InventoryError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let boat = decode_strict(line).inspect_err(|err| {
            debug!(%err, "rejected boat record");
        })?;
        info!(name = %boat.name, place = %boat.place(), "boat added");
        self.boats.push(boat);
        Ok(&self.boats[self.boats.len() - 1])
    }

    /// Remove the first boat with a matching name, keeping the others in
    /// their current order.
    pub fn remove(&mut self, name: &str) -> Result<Boat> {
        let idx = self.position(name)?;
        self.remove_at(idx)
    }

    /// Remove the boat at `index` in the current order. Used by front-ends
    /// that act on a selected row, where names may repeat.
    pub fn remove_at(&mut self, index: usize) -> Result<Boat> {
        if index >= self.boats.len() {
            return Err(InventoryError::NoSuchRow { index });
        }
        let boat = self.boats.remove(index);
        info!(name = %boat.name, index, "boat removed");
        Ok(boat)
    }

    /// Apply a payment against the first boat with a matching name. Payments
    /// larger than the balance are refused and report the balance owed.
    pub fn pay(&mut self, name: &str, amount: Money) -> Result<Payment> {
        if amount.is_negative() {
            return Err(InventoryError::NegativePayment { payment: amount });
        }
        let idx = self.position(name)?;
        self.pay_at(idx, amount)
    }

    /// Apply a payment against the boat at `index` in the current order.
    pub fn pay_at(&mut self, index: usize, amount: Money) -> Result<Payment> {
        if amount.is_negative() {
            return Err(InventoryError::NegativePayment { payment: amount });
        }
        let boat = self
            .boats
            .get_mut(index)
            .ok_or(InventoryError::NoSuchRow { index })?;
        if amount > boat.amount_owed {
            debug!(name = %boat.name, %amount, owed = %boat.amount_owed, "payment rejected");
            return Err(InventoryError::PaymentExceedsOwed {
                payment: amount,
                owed: boat.amount_owed,
            });
        }
        boat.amount_owed -= amount;
        info!(name = %boat.name, %amount, remaining = %boat.amount_owed, "payment accepted");
        Ok(Payment {
            name: boat.name.clone(),
            paid: amount,
            remaining: boat.amount_owed,
        })
    }

    /// Bill every boat one month of storage. Each call charges again; the
    /// return value is the total added across the inventory.
    pub fn apply_monthly_charges(&mut self) -> Money {
        let total: Money = self
            .boats
            .iter_mut()
            .map(|boat| {
                let charge = boat.monthly_charge();
                boat.amount_owed += charge;
                charge
            })
            .sum();
        info!(boats = self.boats.len(), %total, "monthly charges applied");
        total
    }

    /// Order boats alphabetically, ignoring case. Equal names keep their
    /// relative order.
    pub fn sort_by_name(&mut self) {
        self.boats.sort_by_cached_key(|boat| boat.name.to_lowercase());
    }

    pub fn total_owed(&self) -> Money {
        self.boats.iter().map(|boat| boat.amount_owed).sum()
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a Boat;
    type IntoIter = std::slice::Iter<'a, Boat>;

    fn into_iter(self) -> Self::IntoIter {
        self.boats.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;

    fn inventory_with(names: &[&str]) -> Inventory {
        let mut inventory = Inventory::default();
        for name in names {
            inventory
                .push(Boat::new(name, 20, Location::Slip(1), Money::from_cents(10000)))
                .unwrap();
        }
        inventory
    }

    fn names(inventory: &Inventory) -> Vec<&str> {
        inventory.iter().map(|boat| boat.name.as_str()).collect()
    }

    #[test]
    fn add_appends_valid_records() {
        let mut inventory = inventory_with(&["Zeta"]);
        let added = inventory.add_record("Alpha,28,land,B,15.25").unwrap();
        assert_eq!(added.location, Location::Land('B'));
        assert_eq!(names(&inventory), ["Zeta", "Alpha"]);
    }

    #[test]
    fn add_rejects_invalid_records_without_mutation() {
        let mut inventory = inventory_with(&["Zeta"]);
        for line in [
            ",20,slip,1,0",
            "Boat,0,slip,1,0",
            "Boat,20,slip,1,-3",
            "Boat,20,land,AB,0",
            "Boat,20,marina,1,0",
            "Boat,20,slip",
        ] {
            let err = inventory.add_record(line).unwrap_err();
            assert!(matches!(err, InventoryError::Decode(_)), "{line}: {err}");
        }
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn add_rejects_when_full() {
        let mut inventory = Inventory::new(2);
        inventory.add_record("One,10,slip,1,0").unwrap();
        inventory.add_record("Two,10,slip,2,0").unwrap();
        let err = inventory.add_record("Three,10,slip,3,0").unwrap_err();
        assert!(matches!(err, InventoryError::CapacityExceeded { capacity: 2 }));
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn default_capacity_is_one_hundred_twenty() {
        let mut inventory = Inventory::default();
        for i in 0..DEFAULT_CAPACITY {
            inventory.add_record(&format!("Boat {i},10,slip,{i},0")).unwrap();
        }
        assert!(inventory.is_full());
        assert!(inventory.add_record("Extra,10,slip,1,0").is_err());
        assert_eq!(inventory.len(), 120);
    }

    #[test]
    fn remove_takes_first_case_insensitive_match() {
        let mut inventory = inventory_with(&["Alpha", "Echo", "ECHO", "Zulu"]);
        let removed = inventory.remove("echo").unwrap();
        assert_eq!(removed.name, "Echo");
        assert_eq!(names(&inventory), ["Alpha", "ECHO", "Zulu"]);
    }

    #[test]
    fn remove_missing_name_leaves_inventory_alone() {
        let mut inventory = inventory_with(&["Alpha", "Zulu"]);
        let err = inventory.remove("Bravo").unwrap_err();
        assert!(matches!(err, InventoryError::NotFound { .. }));
        assert_eq!(names(&inventory), ["Alpha", "Zulu"]);
    }

    #[test]
    fn row_operations_target_exact_boat_among_duplicates() {
        let mut inventory = Inventory::default();
        inventory.add_record("Echo,20,slip,1,10").unwrap();
        inventory.add_record("echo,20,slip,2,99").unwrap();

        let payment = inventory.pay_at(1, Money::from_cents(5000)).unwrap();
        assert_eq!(payment.remaining, Money::from_cents(4900));
        assert_eq!(inventory.boats()[0].amount_owed, Money::from_cents(1000));

        let removed = inventory.remove_at(1).unwrap();
        assert_eq!(removed.location, Location::Slip(2));
        assert_eq!(names(&inventory), ["Echo"]);

        assert!(matches!(
            inventory.remove_at(1),
            Err(InventoryError::NoSuchRow { index: 1 })
        ));
        assert!(matches!(
            inventory.pay_at(3, Money::ZERO),
            Err(InventoryError::NoSuchRow { index: 3 })
        ));
    }

    #[test]
    fn paying_full_balance_clears_it() {
        let mut inventory = inventory_with(&["Alpha"]);
        let payment = inventory.pay("ALPHA", Money::from_cents(10000)).unwrap();
        assert_eq!(payment.remaining, Money::ZERO);
        assert_eq!(inventory.find("alpha").unwrap().amount_owed, Money::ZERO);
    }

    #[test]
    fn partial_payment_reduces_balance() {
        let mut inventory = inventory_with(&["Alpha"]);
        let payment = inventory.pay("alpha", Money::from_cents(2550)).unwrap();
        assert_eq!(payment.paid, Money::from_cents(2550));
        assert_eq!(payment.remaining, Money::from_cents(7450));
    }

    #[test]
    fn overpayment_is_rejected_with_balance() {
        let mut inventory = inventory_with(&["Alpha"]);
        let err = inventory.pay("Alpha", Money::from_cents(10001)).unwrap_err();
        match err {
            InventoryError::PaymentExceedsOwed { owed, .. } => {
                assert_eq!(owed, Money::from_cents(10000))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(inventory.find("Alpha").unwrap().amount_owed, Money::from_cents(10000));
    }

    #[test]
    fn payment_errors_for_missing_or_negative() {
        let mut inventory = inventory_with(&["Alpha"]);
        assert!(matches!(
            inventory.pay("Bravo", Money::from_cents(1)),
            Err(InventoryError::NotFound { .. })
        ));
        assert!(matches!(
            inventory.pay("Alpha", Money::from_cents(-1)),
            Err(InventoryError::NegativePayment { .. })
        ));
    }

    #[test]
    fn monthly_charges_accumulate_per_call() {
        let mut inventory = Inventory::default();
        inventory.add_record("Sea Breeze,30,slip,12,0").unwrap();
        inventory.add_record("Dry Dock,10,land,C,0").unwrap();
        inventory.add_record("Road Trip,10,trailor,TX1,0").unwrap();
        inventory.add_record("Winter Nap,10,storage,4,0").unwrap();

        let total = inventory.apply_monthly_charges();
        assert_eq!(total, Money::from_cents(37500 + 14000 + 25000 + 11200));
        assert_eq!(inventory.find("Sea Breeze").unwrap().amount_owed, Money::from_cents(37500));

        inventory.apply_monthly_charges();
        assert_eq!(inventory.find("Sea Breeze").unwrap().amount_owed, Money::from_cents(75000));
        assert_eq!(inventory.find("Winter Nap").unwrap().amount_owed, Money::from_cents(22400));
    }

    #[test]
    fn sort_ignores_case_and_keeps_ties_in_order() {
        let mut inventory = inventory_with(&["Zeta", "alpha", "Beta"]);
        inventory.sort_by_name();
        assert_eq!(names(&inventory), ["alpha", "Beta", "Zeta"]);

        let mut ties = Inventory::default();
        ties.add_record("Echo,10,slip,1,0").unwrap();
        ties.add_record("Bravo,10,slip,2,0").unwrap();
        ties.add_record("echo,10,slip,3,0").unwrap();
        ties.add_record("ECHO,10,slip,4,0").unwrap();
        ties.sort_by_name();
        let slips: Vec<_> = ties.iter().map(|boat| boat.location.clone()).collect();
        assert_eq!(
            slips,
            [Location::Slip(2), Location::Slip(1), Location::Slip(3), Location::Slip(4)]
        );
    }

    #[test]
    fn additions_after_sort_append_at_tail() {
        let mut inventory = inventory_with(&["Zeta", "alpha"]);
        inventory.sort_by_name();
        inventory.add_record("Beta,10,slip,1,0").unwrap();
        assert_eq!(names(&inventory), ["alpha", "Zeta", "Beta"]);
    }

    #[test]
    fn total_owed_sums_balances() {
        let inventory = inventory_with(&["Alpha", "Bravo"]);
        assert_eq!(inventory.total_owed(), Money::from_cents(20000));
    }
}
