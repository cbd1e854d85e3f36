//! Routes kind-discriminated mutations to the collection that owns the
//! record.

use crate::{
    Error,
    feed::{TransactionFeed, TransactionKind},
    models::{DatabaseID, Expense, Income, NewExpense, NewIncome, NewTransfer, Transfer},
    stores::{ExpenseStore, IncomeStore, TransferStore},
};

/// Asks the user to confirm a destructive action before it runs.
///
/// Implemented by the embedding application, typically as a modal
/// prompt.
pub trait ConfirmDelete {
    /// Whether the user confirmed deleting the record of `kind` with
    /// `id`.
    fn confirm_delete(&self, kind: TransactionKind, id: DatabaseID) -> bool;
}

/// A [ConfirmDelete] that always proceeds, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmDelete for AlwaysConfirm {
    fn confirm_delete(&self, _: TransactionKind, _: DatabaseID) -> bool {
        true
    }
}

/// The payload for creating a transaction of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NewTransaction {
    /// Create an expense.
    Expense(NewExpense),
    /// Create an income.
    Income(NewIncome),
    /// Create a transfer along with its two legs.
    Transfer(NewTransfer),
}

impl NewTransaction {
    /// The kind of record this payload creates.
    pub fn kind(&self) -> TransactionKind {
        match self {
            NewTransaction::Expense(_) => TransactionKind::Expense,
            NewTransaction::Income(_) => TransactionKind::Income,
            NewTransaction::Transfer(_) => TransactionKind::Transfer,
        }
    }
}

/// The payload for updating a transaction of any kind. The wrapped
/// record's id selects the row to overwrite.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionUpdate {
    /// Update an expense.
    Expense(Expense),
    /// Update an income.
    Income(Income),
    /// Update a transfer. Its legs are not touched.
    Transfer(Transfer),
}

impl<E, I, T> TransactionFeed<E, I, T>
where
    E: ExpenseStore,
    I: IncomeStore,
    T: TransferStore,
{
    /// Create a record of the kind carried by `new_transaction` and
    /// return its id.
    ///
    /// The target collection notifies the outcome and refreshes
    /// itself, which invalidates the aggregate.
    ///
    /// # Errors
    /// Re-throws the target collection's failure so calling UI code
    /// can keep its form open.
    pub fn create(&mut self, new_transaction: NewTransaction) -> Result<DatabaseID, Error> {
        match new_transaction {
            NewTransaction::Expense(new_expense) => {
                Ok(self.expense_collection().create(new_expense)?.id)
            }
            NewTransaction::Income(new_income) => {
                Ok(self.income_collection().create(new_income)?.id)
            }
            NewTransaction::Transfer(new_transfer) => {
                Ok(self.transfer_collection().create(new_transfer)?.id)
            }
        }
    }

    /// Overwrite the record carried by `update`.
    ///
    /// # Errors
    /// Re-throws the target collection's failure so calling UI code
    /// can keep its form open.
    pub fn update(&mut self, update: TransactionUpdate) -> Result<(), Error> {
        match update {
            TransactionUpdate::Expense(expense) => self.expense_collection().update(&expense),
            TransactionUpdate::Income(income) => self.income_collection().update(&income),
            TransactionUpdate::Transfer(transfer) => self.transfer_collection().update(&transfer),
        }
    }

    /// Delete the record of `kind` with `id`, after asking the
    /// confirmation collaborator.
    ///
    /// Returns `Ok(false)` without touching anything if the user
    /// declines. Deleting an id that does not exist is a no-op.
    /// Deleting a transfer leaves its legs in place.
    ///
    /// # Errors
    /// Re-throws the target collection's failure.
    pub fn delete(&mut self, kind: TransactionKind, id: DatabaseID) -> Result<bool, Error> {
        if !self.confirmer().confirm_delete(kind, id) {
            return Ok(false);
        }

        match kind {
            TransactionKind::Expense => self.expense_collection().delete(id)?,
            TransactionKind::Income => self.income_collection().delete(id)?,
            TransactionKind::Transfer => self.transfer_collection().delete(id)?,
        }

        Ok(true)
    }
}

#[cfg(test)]
mod mutation_router_tests {
    use std::sync::Arc;

    use time::macros::date;

    use crate::{
        feed::{ConfirmDelete, TransactionFeed, TransactionKind},
        models::{DatabaseID, NewExpense, NewIncome, NewTransfer},
        notify::test::RecordingNotifier,
        stores::sqlite::{
            SQLiteExpenseStore, SQLiteIncomeStore, SQLiteTransferStore, open_test_stores,
        },
    };

    use super::{AlwaysConfirm, NewTransaction, TransactionUpdate};

    type TestFeed = TransactionFeed<SQLiteExpenseStore, SQLiteIncomeStore, SQLiteTransferStore>;

    /// Declines every delete and records what it was asked.
    #[derive(Default)]
    struct DeclineAll {
        asked: std::sync::Mutex<Vec<(TransactionKind, DatabaseID)>>,
    }

    impl ConfirmDelete for DeclineAll {
        fn confirm_delete(&self, kind: TransactionKind, id: DatabaseID) -> bool {
            self.asked.lock().unwrap().push((kind, id));
            false
        }
    }

    fn feed_with_confirmer(confirm: Arc<dyn ConfirmDelete>) -> TestFeed {
        let stores = open_test_stores();

        TransactionFeed::new(
            stores.expenses,
            stores.incomes,
            stores.transfers,
            Arc::new(RecordingNotifier::default()),
            confirm,
        )
    }

    #[test]
    fn create_routes_each_kind_to_its_collection() {
        let mut feed = feed_with_confirmer(Arc::new(AlwaysConfirm));

        feed.create(NewTransaction::Expense(NewExpense::new(
            1,
            10.0,
            "groceries",
            date!(2024 - 01 - 01),
        )))
        .unwrap();
        feed.create(NewTransaction::Income(NewIncome::new(
            Some(1),
            20.0,
            date!(2024 - 01 - 02),
        )))
        .unwrap();
        feed.create(NewTransaction::Transfer(NewTransfer {
            from_account_id: 1,
            to_account_id: 2,
            amount: 30.0,
            date: date!(2024 - 01 - 03),
            description: None,
        }))
        .unwrap();

        assert_eq!(feed.expenses().len(), 1);
        assert_eq!(feed.incomes().len(), 1);
        assert_eq!(feed.transfers().len(), 1);
        assert_eq!(feed.transactions().len(), 3);
    }

    #[test]
    fn update_routes_by_payload_kind() {
        let mut feed = feed_with_confirmer(Arc::new(AlwaysConfirm));
        feed.create(NewTransaction::Expense(NewExpense::new(
            1,
            10.0,
            "groceries",
            date!(2024 - 01 - 01),
        )))
        .unwrap();

        let mut expense = feed.expenses()[0].clone();
        expense.amount = 15.0;
        feed.update(TransactionUpdate::Expense(expense)).unwrap();

        assert_eq!(feed.expenses()[0].amount, 15.0);
    }

    #[test]
    fn declined_delete_leaves_the_record() {
        let confirmer = Arc::new(DeclineAll::default());
        let mut feed = feed_with_confirmer(confirmer.clone());
        let id = feed
            .create(NewTransaction::Expense(NewExpense::new(
                1,
                10.0,
                "groceries",
                date!(2024 - 01 - 01),
            )))
            .unwrap();

        let deleted = feed.delete(TransactionKind::Expense, id).unwrap();

        assert!(!deleted);
        assert_eq!(feed.expenses().len(), 1);
        assert_eq!(
            confirmer.asked.lock().unwrap().as_slice(),
            &[(TransactionKind::Expense, id)]
        );
    }

    #[test]
    fn confirmed_delete_removes_only_the_target_kind() {
        let mut feed = feed_with_confirmer(Arc::new(AlwaysConfirm));
        let expense_id = feed
            .create(NewTransaction::Expense(NewExpense::new(
                1,
                10.0,
                "groceries",
                date!(2024 - 01 - 01),
            )))
            .unwrap();
        feed.create(NewTransaction::Income(NewIncome::new(
            Some(1),
            20.0,
            date!(2024 - 01 - 02),
        )))
        .unwrap();

        let deleted = feed.delete(TransactionKind::Expense, expense_id).unwrap();

        assert!(deleted);
        assert_eq!(feed.expenses().len(), 0);
        assert_eq!(feed.incomes().len(), 1);
    }

    #[test]
    fn deleting_a_missing_id_is_a_no_op() {
        let mut feed = feed_with_confirmer(Arc::new(AlwaysConfirm));

        let deleted = feed.delete(TransactionKind::Income, 404).unwrap();

        assert!(deleted);
        assert_eq!(feed.incomes().len(), 0);
    }
}
