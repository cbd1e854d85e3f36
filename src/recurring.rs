//! The generator that materialises due recurring templates into
//! concrete expense and income records.
//!
//! The feed never talks to this module; it only consumes the records
//! the generator writes, recognising them by their `recurring_id`.

use time::Date;

use crate::{
    Error,
    models::{NewExpense, NewIncome, RecurringKind, RecurringTemplate},
    stores::{ExpenseStore, IncomeStore, RecurringStore},
};

/// The category given to records materialised from a template that has
/// no category of its own.
pub const RECURRING_CATEGORY: &str = "recurring";

/// What a generator run produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorReport {
    /// How many expenses were materialised.
    pub expenses_created: usize,
    /// How many incomes were materialised.
    pub incomes_created: usize,
    /// How many due templates were skipped because they cannot be
    /// materialised (an expense template with no account).
    pub skipped: usize,
}

/// Materialise every template whose trigger day has been reached this
/// month and which has not fired this month yet.
///
/// Each materialised record is dated on the template's trigger day
/// (clamped to the length of the month) and carries the template's id
/// in its `recurring_id`. The template's last-triggered date is updated
/// afterwards, so re-running the generator within the same month is a
/// no-op.
///
/// # Errors
/// Returns the first store error encountered. Records materialised
/// before the failure remain in place.
pub fn run_due_templates<R, E, I>(
    templates: &mut R,
    expenses: &mut E,
    incomes: &mut I,
    today: Date,
) -> Result<GeneratorReport, Error>
where
    R: RecurringStore,
    E: ExpenseStore,
    I: IncomeStore,
{
    let mut report = GeneratorReport::default();

    for template in templates.get_all()? {
        let Some(trigger_date) = due_date(&template, today) else {
            continue;
        };

        match template.kind {
            RecurringKind::Expense => {
                let Some(account_id) = template.account_id else {
                    tracing::warn!(
                        "skipping recurring expense template {}: it has no account",
                        template.id
                    );
                    report.skipped += 1;
                    continue;
                };

                expenses.create(NewExpense {
                    account_id,
                    amount: template.amount,
                    category: template
                        .category
                        .clone()
                        .unwrap_or_else(|| RECURRING_CATEGORY.to_string()),
                    description: template.description.clone(),
                    date: trigger_date,
                    installment: false,
                    recurring_id: Some(template.id),
                    transfer_id: None,
                })?;
                report.expenses_created += 1;
            }
            RecurringKind::Income => {
                incomes.create(NewIncome {
                    account_id: template.account_id,
                    amount: template.amount,
                    category: template.category.clone(),
                    description: template.description.clone(),
                    date: trigger_date,
                    recurring_id: Some(template.id),
                    transfer_id: None,
                })?;
                report.incomes_created += 1;
            }
        }

        templates.mark_triggered(template.id, trigger_date)?;
        tracing::info!(
            "materialised recurring template {} for {}",
            template.id,
            trigger_date
        );
    }

    Ok(report)
}

/// The date the template should fire on this month, or `None` if it is
/// not due: either the trigger day has not been reached yet, or the
/// template already fired this month.
fn due_date(template: &RecurringTemplate, today: Date) -> Option<Date> {
    let days_in_month = today.month().length(today.year());
    let trigger_day = template.day_of_month.min(days_in_month);

    if today.day() < trigger_day {
        return None;
    }

    if let Some(last) = template.last_triggered
        && (last.year(), u8::from(last.month())) >= (today.year(), u8::from(today.month()))
    {
        return None;
    }

    Date::from_calendar_date(today.year(), today.month(), trigger_day).ok()
}

#[cfg(test)]
mod generator_tests {
    use time::macros::date;

    use crate::{
        models::{NewRecurringTemplate, RecurringKind},
        stores::{
            ExpenseStore, IncomeStore, RecurringStore,
            sqlite::{SQLiteStores, open_test_stores},
        },
    };

    use super::{GeneratorReport, run_due_templates};

    fn template(day_of_month: u8, kind: RecurringKind) -> NewRecurringTemplate {
        NewRecurringTemplate {
            day_of_month,
            amount: 1200.0,
            account_id: Some(1),
            category: Some("rent".to_string()),
            description: None,
            kind,
        }
    }

    fn run(stores: &mut SQLiteStores, today: time::Date) -> GeneratorReport {
        let mut recurring = stores.recurring.clone();
        let mut expenses = stores.expenses.clone();
        let mut incomes = stores.incomes.clone();

        run_due_templates(&mut recurring, &mut expenses, &mut incomes, today).unwrap()
    }

    #[test]
    fn due_expense_template_materialises_on_the_trigger_day() {
        let mut stores = open_test_stores();
        let created = stores
            .recurring
            .create(template(15, RecurringKind::Expense))
            .unwrap();

        let report = run(&mut stores, date!(2024 - 06 - 20));

        assert_eq!(report.expenses_created, 1);
        let expenses = stores.expenses.get_all().unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].date, date!(2024 - 06 - 15));
        assert_eq!(expenses[0].recurring_id, Some(created.id));
        assert_eq!(expenses[0].category, "rent");

        let template = stores.recurring.get_by_id(created.id).unwrap();
        assert_eq!(template.last_triggered, Some(date!(2024 - 06 - 15)));
    }

    #[test]
    fn template_does_not_fire_before_its_day() {
        let mut stores = open_test_stores();
        stores
            .recurring
            .create(template(15, RecurringKind::Expense))
            .unwrap();

        let report = run(&mut stores, date!(2024 - 06 - 10));

        assert_eq!(report, GeneratorReport::default());
        assert_eq!(stores.expenses.get_all().unwrap(), vec![]);
    }

    #[test]
    fn template_fires_at_most_once_per_month() {
        let mut stores = open_test_stores();
        stores
            .recurring
            .create(template(15, RecurringKind::Expense))
            .unwrap();

        run(&mut stores, date!(2024 - 06 - 20));
        let second = run(&mut stores, date!(2024 - 06 - 25));

        assert_eq!(second.expenses_created, 0);
        assert_eq!(stores.expenses.get_all().unwrap().len(), 1);
    }

    #[test]
    fn template_fires_again_the_next_month() {
        let mut stores = open_test_stores();
        stores
            .recurring
            .create(template(15, RecurringKind::Expense))
            .unwrap();

        run(&mut stores, date!(2024 - 06 - 20));
        let next_month = run(&mut stores, date!(2024 - 07 - 15));

        assert_eq!(next_month.expenses_created, 1);

        let dates: Vec<time::Date> = stores
            .expenses
            .get_all()
            .unwrap()
            .iter()
            .map(|expense| expense.date)
            .collect();
        assert_eq!(dates, vec![date!(2024 - 06 - 15), date!(2024 - 07 - 15)]);
    }

    #[test]
    fn trigger_day_clamps_to_the_length_of_the_month() {
        let mut stores = open_test_stores();
        stores
            .recurring
            .create(template(31, RecurringKind::Expense))
            .unwrap();

        let report = run(&mut stores, date!(2024 - 06 - 30));

        assert_eq!(report.expenses_created, 1);
        assert_eq!(
            stores.expenses.get_all().unwrap()[0].date,
            date!(2024 - 06 - 30)
        );
    }

    #[test]
    fn income_template_without_account_still_fires() {
        let mut stores = open_test_stores();
        let mut salary = template(25, RecurringKind::Income);
        salary.account_id = None;
        stores.recurring.create(salary).unwrap();

        let report = run(&mut stores, date!(2024 - 06 - 25));

        assert_eq!(report.incomes_created, 1);
        let incomes = stores.incomes.get_all().unwrap();
        assert_eq!(incomes[0].account_id, None);
        assert!(incomes[0].recurring_id.is_some());
    }

    #[test]
    fn expense_template_without_account_is_skipped() {
        let mut stores = open_test_stores();
        let mut broken = template(1, RecurringKind::Expense);
        broken.account_id = None;
        stores.recurring.create(broken).unwrap();

        let report = run(&mut stores, date!(2024 - 06 - 20));

        assert_eq!(report.skipped, 1);
        assert_eq!(report.expenses_created, 0);
        assert_eq!(stores.expenses.get_all().unwrap(), vec![]);
    }
}
