//! Data models for member accounts

/// Member account identifier
pub type AccountId = i64;

/// Member account holding a spendable points balance.
///
/// Balance invariant: `points >= 0` at all times. [`Account::debit`] clamps
/// at zero so a negative balance can never be produced, let alone persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub is_active: bool,
    pub points: i64,
}

impl Account {
    pub fn new(id: AccountId, points: i64) -> Self {
        Self {
            id,
            is_active: true,
            points,
        }
    }

    /// Add points to the balance. Non-positive amounts are ignored.
    pub fn credit(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        self.points = self.points.saturating_add(amount);
    }

    /// Remove points from the balance, clamping at zero.
    /// Non-positive amounts are ignored.
    pub fn debit(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        self.points = (self.points - amount).max(0);
    }

    /// Check whether the balance covers `amount`.
    #[inline]
    pub fn can_afford(&self, amount: i64) -> bool {
        self.points >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_is_active() {
        let acc = Account::new(1, 100);
        assert!(acc.is_active);
        assert_eq!(acc.points, 100);
    }

    #[test]
    fn test_credit_and_debit() {
        let mut acc = Account::new(1, 100);
        acc.credit(50);
        assert_eq!(acc.points, 150);
        acc.debit(30);
        assert_eq!(acc.points, 120);
    }

    #[test]
    fn test_debit_clamps_at_zero() {
        let mut acc = Account::new(1, 10);
        acc.debit(30);
        assert_eq!(acc.points, 0);
    }

    #[test]
    fn test_non_positive_amounts_are_ignored() {
        let mut acc = Account::new(1, 100);
        acc.credit(0);
        acc.credit(-5);
        acc.debit(0);
        acc.debit(-5);
        assert_eq!(acc.points, 100);
    }

    #[test]
    fn test_credit_saturates() {
        let mut acc = Account::new(1, i64::MAX - 1);
        acc.credit(100);
        assert_eq!(acc.points, i64::MAX);
    }

    #[test]
    fn test_can_afford() {
        let acc = Account::new(1, 100);
        assert!(acc.can_afford(100));
        assert!(acc.can_afford(1));
        assert!(!acc.can_afford(101));
    }
}
