//! The transaction feed: one consistent, filterable, chronologically
//! ordered stream over the three transaction kinds.

mod router;
mod tagged;

pub use router::{AlwaysConfirm, ConfirmDelete, NewTransaction, TransactionUpdate};
pub use tagged::{TaggedTransaction, TransactionKind};

use std::sync::Arc;

use crate::{
    Error,
    collection::{ExpenseCollection, FilterState, IncomeCollection, RecurringScope,
        TransferCollection},
    models::{DatabaseID, Expense, Income, TransferView},
    notify::Notifier,
    stores::{DateRange, ExpenseStore, IncomeStore, TransferStore},
};

/// The tab currently selected in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedTab {
    /// All three kinds merged into one stream.
    #[default]
    All,
    /// Only expenses.
    Expense,
    /// Only incomes.
    Income,
    /// Only transfers.
    Transfer,
}

impl From<TransactionKind> for FeedTab {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Expense => FeedTab::Expense,
            TransactionKind::Income => FeedTab::Income,
            TransactionKind::Transfer => FeedTab::Transfer,
        }
    }
}

/// The inputs the feed's memoized aggregate was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CacheKey {
    expense_revision: u64,
    income_revision: u64,
    transfer_revision: u64,
    tab: FeedTab,
    recurring_scope: RecurringScope,
}

struct FeedCache {
    key: CacheKey,
    transactions: Vec<TaggedTransaction>,
}

/// Merges the three per-kind collections into one ordered transaction
/// stream.
///
/// The aggregate is derived on read and memoized on the identity of
/// its inputs: the three collections' revisions, the selected tab and
/// the recurring scope. Any filter change or mutation invalidates the
/// affected collection, which changes its revision and causes the next
/// read to recompute.
pub struct TransactionFeed<E, I, T>
where
    E: ExpenseStore,
    I: IncomeStore,
    T: TransferStore,
{
    expenses: ExpenseCollection<E>,
    incomes: IncomeCollection<I>,
    transfers: TransferCollection<T, E, I>,
    tab: FeedTab,
    recurring_scope: RecurringScope,
    confirm: Arc<dyn ConfirmDelete>,
    cache: Option<FeedCache>,
}

impl<E, I, T> TransactionFeed<E, I, T>
where
    E: ExpenseStore,
    I: IncomeStore,
    T: TransferStore,
{
    /// Create a feed over the three stores.
    ///
    /// The expense and income stores are cloned into the transfer
    /// collection so it can materialise and join transfer legs.
    pub fn new(
        expense_store: E,
        income_store: I,
        transfer_store: T,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn ConfirmDelete>,
    ) -> Self
    where
        E: Clone,
        I: Clone,
    {
        let transfers = TransferCollection::new(
            transfer_store,
            expense_store.clone(),
            income_store.clone(),
            notifier.clone(),
        );

        Self {
            expenses: ExpenseCollection::new(expense_store, notifier.clone()),
            incomes: IncomeCollection::new(income_store, notifier),
            transfers,
            tab: FeedTab::default(),
            recurring_scope: RecurringScope::default(),
            confirm,
            cache: None,
        }
    }

    /// The transaction stream for the current tab and recurring scope.
    ///
    /// On the [FeedTab::All] tab, the three tagged sets are
    /// concatenated in the order expense, income, transfer and
    /// stable-sorted by date descending, so records sharing a date
    /// keep that order. On a kind tab only that kind's tagged set is
    /// returned. While a recurring scope is active transfers are
    /// excluded everywhere, since recurring templates never produce
    /// transfers.
    pub fn transactions(&mut self) -> &[TaggedTransaction] {
        // Pull each source first so the revisions reflect the current
        // filter state.
        self.expenses.records();
        self.incomes.records();
        self.transfers.records();

        let key = CacheKey {
            expense_revision: self.expenses.revision(),
            income_revision: self.incomes.revision(),
            transfer_revision: self.transfers.revision(),
            tab: self.tab,
            recurring_scope: self.recurring_scope,
        };

        let stale = self.cache.as_ref().is_none_or(|cache| cache.key != key);

        if stale {
            let transactions = self.assemble();
            self.cache = Some(FeedCache { key, transactions });
        }

        self.cache
            .as_ref()
            .map(|cache| cache.transactions.as_slice())
            .unwrap_or(&[])
    }

    fn assemble(&self) -> Vec<TaggedTransaction> {
        let tagged_expenses = || {
            self.expenses
                .loaded()
                .iter()
                .cloned()
                .map(TaggedTransaction::Expense)
        };
        let tagged_incomes = || {
            self.incomes
                .loaded()
                .iter()
                .cloned()
                .map(TaggedTransaction::Income)
        };
        let tagged_transfers = || {
            self.transfers
                .loaded()
                .iter()
                .cloned()
                .map(TaggedTransaction::Transfer)
        };

        match self.tab {
            FeedTab::Expense => tagged_expenses().collect(),
            FeedTab::Income => tagged_incomes().collect(),
            FeedTab::Transfer => {
                if self.recurring_scope == RecurringScope::All {
                    tagged_transfers().collect()
                } else {
                    Vec::new()
                }
            }
            FeedTab::All => {
                let mut merged: Vec<TaggedTransaction> =
                    tagged_expenses().chain(tagged_incomes()).collect();

                if self.recurring_scope == RecurringScope::All {
                    merged.extend(tagged_transfers());
                }

                // Stable sort: ties keep concatenation order.
                merged.sort_by(|a, b| b.date().cmp(&a.date()));
                merged
            }
        }
    }

    /// Whether any of the three sources is still loading.
    pub fn is_loading(&self) -> bool {
        self.expenses.is_loading() || self.incomes.is_loading() || self.transfers.is_loading()
    }

    /// The first load error among the three sources, if any.
    ///
    /// Load failures never break the aggregate: the failed source
    /// contributes an empty set and its error is surfaced here.
    pub fn error(&self) -> Option<&Error> {
        self.expenses
            .error()
            .or_else(|| self.incomes.error())
            .or_else(|| self.transfers.error())
    }

    /// Mark all three sources stale so the next read re-queries them.
    pub fn refresh(&mut self) {
        self.expenses.refresh();
        self.incomes.refresh();
        self.transfers.refresh();
    }

    /// Apply a recurring scope, category and account filter to the
    /// expense and income collections.
    ///
    /// Transfers carry none of these filters; the scope is instead
    /// used to drop them from the aggregate while it is active.
    pub fn filter(
        &mut self,
        recurring_scope: RecurringScope,
        category: Option<&str>,
        account_id: Option<DatabaseID>,
    ) {
        self.recurring_scope = recurring_scope;
        self.expenses.filter(recurring_scope, category, account_id);
        self.incomes.filter(recurring_scope, category, account_id);
    }

    /// Apply a date range filter to all three collections.
    pub fn filter_by_date_range(&mut self, date_range: DateRange) {
        self.expenses.filter_by_date_range(date_range);
        self.incomes.filter_by_date_range(date_range);
        self.transfers.filter_by_date_range(date_range);
    }

    /// Switch the feed to `tab`.
    pub fn change_tab(&mut self, tab: FeedTab) {
        self.tab = tab;
    }

    /// The currently selected tab.
    pub fn current_tab(&self) -> FeedTab {
        self.tab
    }

    /// The expenses selected by the expense collection's filters.
    pub fn expenses(&mut self) -> &[Expense] {
        self.expenses.records()
    }

    /// The incomes selected by the income collection's filters.
    pub fn incomes(&mut self) -> &[Income] {
        self.incomes.records()
    }

    /// The enriched transfers selected by the transfer collection's
    /// date range.
    pub fn transfers(&mut self) -> &[TransferView] {
        self.transfers.records()
    }

    /// The expense collection's filter state.
    pub fn expense_filter(&self) -> &FilterState {
        self.expenses.filter_state()
    }

    /// The income collection's filter state.
    pub fn income_filter(&self) -> &FilterState {
        self.incomes.filter_state()
    }

    /// The transfer collection's date range.
    pub fn transfer_date_range(&self) -> &DateRange {
        self.transfers.date_range()
    }

    pub(crate) fn expense_collection(&mut self) -> &mut ExpenseCollection<E> {
        &mut self.expenses
    }

    pub(crate) fn income_collection(&mut self) -> &mut IncomeCollection<I> {
        &mut self.incomes
    }

    pub(crate) fn transfer_collection(&mut self) -> &mut TransferCollection<T, E, I> {
        &mut self.transfers
    }

    pub(crate) fn confirmer(&self) -> Arc<dyn ConfirmDelete> {
        self.confirm.clone()
    }
}
