//! The filtered collection of transfers, enriched with their legs.

use std::sync::Arc;

use crate::{
    Error,
    models::{DatabaseID, NewExpense, NewIncome, NewTransfer, Transfer, TransferView},
    notify::Notifier,
    stores::{DateRange, ExpenseStore, IncomeStore, TransferStore},
};

/// The category given to the expense and income legs materialised for a
/// transfer.
pub const TRANSFER_CATEGORY: &str = "transfer";

/// Holds the transfer date-range filter and the enriched record set it
/// selects.
///
/// Transfers have no category, account or recurring filter, so the
/// filter state is just a date range. Each selected transfer is joined
/// to its expense and income legs to produce a [TransferView].
pub struct TransferCollection<T, E, I>
where
    T: TransferStore,
    E: ExpenseStore,
    I: IncomeStore,
{
    transfers: T,
    expenses: E,
    incomes: I,
    notifier: Arc<dyn Notifier>,
    date_range: DateRange,
    records: Option<Vec<TransferView>>,
    error: Option<Error>,
    dirty: bool,
    revision: u64,
}

impl<T, E, I> TransferCollection<T, E, I>
where
    T: TransferStore,
    E: ExpenseStore,
    I: IncomeStore,
{
    /// Create a collection over the three stores with no filter
    /// applied.
    ///
    /// The expense and income stores are needed to materialise and
    /// join the legs of each transfer.
    pub fn new(transfers: T, expenses: E, incomes: I, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transfers,
            expenses,
            incomes,
            notifier,
            date_range: DateRange::default(),
            records: None,
            error: None,
            dirty: true,
            revision: 0,
        }
    }

    /// The enriched transfers selected by the current date range,
    /// re-deriving them from the stores if the collection is stale.
    pub fn records(&mut self) -> &[TransferView] {
        if self.dirty || self.records.is_none() {
            self.load();
        }

        self.records.as_deref().unwrap_or(&[])
    }

    /// The record set from the last load, without re-deriving.
    pub(crate) fn loaded(&self) -> &[TransferView] {
        self.records.as_deref().unwrap_or(&[])
    }

    /// Whether the record set has not yet caught up with the filter
    /// state.
    pub fn is_loading(&self) -> bool {
        self.dirty || self.records.is_none()
    }

    /// The error from the last failed load or `None` if it succeeded.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// A counter that changes every time the record set is re-derived.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The currently applied date range.
    pub fn date_range(&self) -> &DateRange {
        &self.date_range
    }

    /// Mark the collection stale so the next read re-queries the store.
    pub fn refresh(&mut self) {
        self.dirty = true;
    }

    /// Replace the date range filter.
    pub fn filter_by_date_range(&mut self, date_range: DateRange) {
        self.date_range = date_range;
        self.refresh();
    }

    /// Create a transfer along with its two legs: an expense debiting
    /// the source account and an income crediting the destination
    /// account. The leg ids are recorded on the transfer.
    ///
    /// # Errors
    /// Failures are re-thrown after notifying so the caller can react
    /// as well.
    pub fn create(&mut self, new_transfer: NewTransfer) -> Result<Transfer, Error> {
        match self.create_with_legs(new_transfer) {
            Ok(transfer) => {
                self.notifier.success("Transfer created successfully");
                self.refresh();
                Ok(transfer)
            }
            Err(error) => {
                self.notifier.error("Failed to create transfer");
                Err(error)
            }
        }
    }

    /// Update a transfer, notify the outcome and mark the collection
    /// stale. The legs are not modified.
    ///
    /// # Errors
    /// Failures are re-thrown after notifying so the caller can react
    /// as well.
    pub fn update(&mut self, transfer: &Transfer) -> Result<(), Error> {
        match self.transfers.update(transfer) {
            Ok(()) => {
                self.notifier.success("Transfer updated successfully");
                self.refresh();
                Ok(())
            }
            Err(error) => {
                self.notifier.error("Failed to update transfer");
                Err(error)
            }
        }
    }

    /// Delete a transfer, notify the outcome and mark the collection
    /// stale. Deleting an id that does not exist is a no-op.
    ///
    /// The transfer's legs are intentionally left in place: cleaning
    /// them up would need a cross-kind transaction the engine does not
    /// provide.
    ///
    /// # Errors
    /// Failures are re-thrown after notifying so the caller can react
    /// as well.
    pub fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        match self.transfers.delete(id) {
            Ok(()) => {
                self.notifier.success("Transfer deleted");
                self.refresh();
                Ok(())
            }
            Err(error) => {
                self.notifier.error("Failed to delete transfer");
                Err(error)
            }
        }
    }

    fn create_with_legs(&mut self, new_transfer: NewTransfer) -> Result<Transfer, Error> {
        let mut transfer = self.transfers.create(new_transfer)?;

        let expense_leg = self.expenses.create(NewExpense {
            account_id: transfer.from_account_id,
            amount: transfer.amount,
            category: TRANSFER_CATEGORY.to_string(),
            description: transfer.description.clone(),
            date: transfer.date,
            installment: false,
            recurring_id: None,
            transfer_id: Some(transfer.id),
        })?;

        let income_leg = self.incomes.create(NewIncome {
            account_id: Some(transfer.to_account_id),
            amount: transfer.amount,
            category: Some(TRANSFER_CATEGORY.to_string()),
            description: transfer.description.clone(),
            date: transfer.date,
            recurring_id: None,
            transfer_id: Some(transfer.id),
        })?;

        transfer.expense_leg_id = Some(expense_leg.id);
        transfer.income_leg_id = Some(income_leg.id);
        self.transfers.update(&transfer)?;

        Ok(transfer)
    }

    fn load(&mut self) {
        match self.run_query() {
            Ok(transfers) => {
                self.records = Some(transfers);
                self.error = None;
            }
            Err(error) => {
                tracing::error!("failed to load transfers: {error}");
                self.notifier.error("Failed to load transfers");
                self.records = Some(Vec::new());
                self.error = Some(error);
            }
        }

        self.dirty = false;
        self.revision += 1;
    }

    fn run_query(&self) -> Result<Vec<TransferView>, Error> {
        let transfers = if self.date_range.is_set() {
            self.transfers.get_by_date_range(&self.date_range)?
        } else {
            self.transfers.get_all()?
        };

        transfers
            .into_iter()
            .map(|transfer| self.enrich(transfer))
            .collect()
    }

    /// Join a transfer to its legs. A leg that cannot be found is
    /// `None`, not an error.
    fn enrich(&self, transfer: Transfer) -> Result<TransferView, Error> {
        let expense = match transfer.expense_leg_id {
            Some(id) => match self.expenses.get_by_id(id) {
                Ok(expense) => Some(expense),
                Err(Error::NotFound) => None,
                Err(error) => return Err(error),
            },
            None => None,
        };

        let income = match transfer.income_leg_id {
            Some(id) => match self.incomes.get_by_id(id) {
                Ok(income) => Some(income),
                Err(Error::NotFound) => None,
                Err(error) => return Err(error),
            },
            None => None,
        };

        Ok(TransferView {
            transfer,
            expense,
            income,
        })
    }
}

#[cfg(test)]
mod transfer_collection_tests {
    use std::sync::Arc;

    use time::macros::date;

    use crate::{
        models::NewTransfer,
        notify::test::RecordingNotifier,
        stores::{DateRange, TransferStore, sqlite::open_test_stores},
    };

    use super::{TRANSFER_CATEGORY, TransferCollection};

    type TestCollection = TransferCollection<
        crate::stores::sqlite::SQLiteTransferStore,
        crate::stores::sqlite::SQLiteExpenseStore,
        crate::stores::sqlite::SQLiteIncomeStore,
    >;

    fn collection() -> TestCollection {
        let stores = open_test_stores();
        TransferCollection::new(
            stores.transfers,
            stores.expenses,
            stores.incomes,
            Arc::new(RecordingNotifier::default()),
        )
    }

    fn new_transfer(amount: f64, date: time::Date) -> NewTransfer {
        NewTransfer {
            from_account_id: 1,
            to_account_id: 2,
            amount,
            date,
            description: Some("topping up the card".to_string()),
        }
    }

    #[test]
    fn create_materialises_both_legs() {
        let mut collection = collection();

        let transfer = collection
            .create(new_transfer(200.0, date!(2024 - 03 - 05)))
            .unwrap();

        assert!(transfer.expense_leg_id.is_some());
        assert!(transfer.income_leg_id.is_some());

        let records = collection.records();
        assert_eq!(records.len(), 1);

        let view = &records[0];
        let expense = view.expense.as_ref().expect("expense leg should be joined");
        let income = view.income.as_ref().expect("income leg should be joined");

        assert_eq!(expense.account_id, 1);
        assert_eq!(expense.amount, 200.0);
        assert_eq!(expense.category, TRANSFER_CATEGORY);
        assert_eq!(expense.transfer_id, Some(transfer.id));
        assert_eq!(income.account_id, Some(2));
        assert_eq!(income.transfer_id, Some(transfer.id));
    }

    #[test]
    fn missing_legs_are_not_an_error() {
        let mut collection = collection();
        // A transfer created directly against the store has no legs.
        collection
            .transfers
            .create(new_transfer(50.0, date!(2024 - 03 - 06)))
            .unwrap();

        let records = collection.records();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].expense, None);
        assert_eq!(records[0].income, None);
    }

    #[test]
    fn date_range_filter_selects_only_matching_transfers() {
        let mut collection = collection();
        collection
            .create(new_transfer(1.0, date!(2024 - 01 - 15)))
            .unwrap();
        collection
            .create(new_transfer(2.0, date!(2024 - 02 - 15)))
            .unwrap();

        collection.filter_by_date_range(
            DateRange::new(Some(date!(2024 - 02 - 01)), Some(date!(2024 - 02 - 29))).unwrap(),
        );
        let records = collection.records();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transfer.date, date!(2024 - 02 - 15));
    }

    #[test]
    fn delete_leaves_legs_in_place() {
        let mut collection = collection();
        let transfer = collection
            .create(new_transfer(75.0, date!(2024 - 04 - 01)))
            .unwrap();

        collection.delete(transfer.id).unwrap();

        assert_eq!(collection.records().len(), 0);
        // The legs survive the transfer's deletion.
        use crate::stores::{ExpenseStore, IncomeStore};
        assert_eq!(
            collection
                .expenses
                .get_by_id(transfer.expense_leg_id.unwrap())
                .unwrap()
                .transfer_id,
            Some(transfer.id)
        );
        assert!(
            collection
                .incomes
                .get_by_id(transfer.income_leg_id.unwrap())
                .is_ok()
        );
    }
}
