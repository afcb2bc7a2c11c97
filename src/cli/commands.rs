use chrono::{DateTime, NaiveDate, Utc};

use crate::cli::output;
use crate::cli::{
    AddArgs, BackupCommand, CategoryAddArgs, CategoryCommand, Cli, CliError, CliResult, Command,
    DashboardArgs, RecurringAddArgs, RecurringCommand, RegisterArgs,
};
use crate::config::{Config, ConfigManager};
use crate::core::aggregation;
use crate::core::filters::TransactionFilter;
use crate::core::record_store::RecordStore;
use crate::currency::format_amount_in;
use crate::domain::{Category, NewCategory, NewRecurringTransaction, NewTransaction, RecordId};
use crate::storage::JsonStorage;
use crate::utils::{build_info, paths};

struct Session {
    store: RecordStore,
    config: Config,
    user_email: Option<String>,
}

impl Session {
    fn open(cli: &Cli) -> CliResult<Self> {
        let base = paths::app_data_dir(cli.data_dir.clone());
        let config = ConfigManager::with_base_dir(base.clone())?.load()?;
        let storage = JsonStorage::new(base, Some(config.backup_retention))?;
        let store = RecordStore::with_config(Box::new(storage), &config)?;
        Ok(Self {
            store,
            config,
            user_email: cli.user.clone(),
        })
    }

    fn user_id(&self) -> CliResult<RecordId> {
        let email = self.user_email.as_deref().ok_or_else(|| {
            CliError::Input("no user selected; pass --user <EMAIL> or set FINTRACK_USER".into())
        })?;
        self.store
            .user_by_email(email)?
            .map(|user| user.id)
            .ok_or_else(|| CliError::Input(format!("no user registered with email `{email}`")))
    }

    fn category_named(&self, user_id: &RecordId, name: &str) -> CliResult<Category> {
        self.store
            .get_categories(user_id)?
            .into_iter()
            .find(|category| category.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| CliError::Input(format!("unknown category `{name}`")))
    }

    fn money(&self, amount: f64) -> String {
        format_amount_in(amount, self.config.currency, self.config.number_locale())
    }
}

pub(super) fn dispatch(cli: Cli) -> CliResult<()> {
    if matches!(cli.command, Command::Version) {
        println!("{}", build_info::current());
        return Ok(());
    }
    let session = Session::open(&cli)?;
    let now = Utc::now();
    match cli.command {
        Command::Register(args) => register(&session, args),
        Command::Add(args) => add(&session, args, now),
        Command::Recurring { command } => match command {
            RecurringCommand::Add(args) => recurring_add(&session, args),
            RecurringCommand::List => recurring_list(&session),
            RecurringCommand::Due => recurring_due(&session, now),
            RecurringCommand::Process => recurring_process(&session, now),
        },
        Command::Category { command } => match command {
            CategoryCommand::Add(args) => category_add(&session, args),
            CategoryCommand::List => category_list(&session),
        },
        Command::Dashboard(args) => dashboard(&session, args, now),
        Command::Budget => budget(&session, now),
        Command::Backup { command } => backup(&session, command),
        Command::Version => Ok(()),
    }
}

fn register(session: &Session, args: RegisterArgs) -> CliResult<()> {
    let user = session
        .store
        .register_user(&args.email, &args.name, &args.password_hash)?;
    output::success(format!("registered {} <{}>", user.name, user.email));
    let seeded = session.store.get_categories(&user.id)?.len();
    if seeded > 0 {
        output::info(format!("{seeded} default categories created"));
    }
    Ok(())
}

fn add(session: &Session, args: AddArgs, now: DateTime<Utc>) -> CliResult<()> {
    let user_id = session.user_id()?;
    let category = session.category_named(&user_id, &args.category)?;
    let date = args.date.map(start_of_day).unwrap_or(now);
    let receipt = session.store.add_transaction(
        &user_id,
        NewTransaction {
            amount: args.amount,
            description: args.description,
            date,
            kind: args.kind,
            category_id: category.id,
            wallet_id: None,
        },
    )?;
    let txn = &receipt.transaction;
    output::success(format!(
        "{} {} recorded in {} ({})",
        txn.kind,
        session.money(txn.amount),
        category.name,
        txn.date.format("%Y-%m-%d")
    ));
    if receipt.budget.is_over_budget {
        output::warning(format!(
            "budget exceeded for {}: spent {} of {}",
            receipt
                .budget
                .category_name
                .as_deref()
                .unwrap_or(&category.name),
            session.money(receipt.budget.spent),
            session.money(receipt.budget.budget.unwrap_or_default())
        ));
    }
    Ok(())
}

fn recurring_add(session: &Session, args: RecurringAddArgs) -> CliResult<()> {
    let user_id = session.user_id()?;
    let category = session.category_named(&user_id, &args.category)?;
    let template = session.store.create_recurring_transaction(
        &user_id,
        NewRecurringTransaction {
            amount: args.amount,
            description: args.description,
            kind: args.kind,
            category_id: category.id,
            day_of_month: args.day,
        },
    )?;
    output::success(format!(
        "recurring {} of {} scheduled on day {}",
        template.kind,
        session.money(template.amount),
        template.day_of_month
    ));
    Ok(())
}

fn recurring_list(session: &Session) -> CliResult<()> {
    let user_id = session.user_id()?;
    let templates = session.store.get_recurring_transactions(&user_id)?;
    output::section("Recurring transactions");
    if templates.is_empty() {
        output::info("no recurring transactions");
        return Ok(());
    }
    for template in templates {
        let last = template
            .last_generated
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "never".into());
        output::row(
            format!("day {:>2}  {}", template.day_of_month, template.description),
            format!(
                "{} {}  last generated {last}",
                template.kind,
                session.money(template.amount)
            ),
        );
    }
    Ok(())
}

fn recurring_due(session: &Session, now: DateTime<Utc>) -> CliResult<()> {
    let user_id = session.user_id()?;
    let due = session.store.due_recurring(&user_id, now)?;
    output::section("Due recurring transactions");
    if due.is_empty() {
        output::info("nothing due");
    }
    for template in due {
        output::row(
            format!("day {:>2}  {}", template.day_of_month, template.description),
            format!("{} {}", template.kind, session.money(template.amount)),
        );
    }
    Ok(())
}

fn recurring_process(session: &Session, now: DateTime<Utc>) -> CliResult<()> {
    let user_id = session.user_id()?;
    let generated = session.store.process_recurring(&user_id, now)?;
    if generated.is_empty() {
        output::info("no recurring transactions due");
    } else {
        for txn in &generated {
            output::success(format!(
                "generated {} {} ({})",
                txn.description,
                session.money(txn.amount),
                txn.kind
            ));
        }
    }
    Ok(())
}

fn category_add(session: &Session, args: CategoryAddArgs) -> CliResult<()> {
    let user_id = session.user_id()?;
    let category = session.store.create_category(
        &user_id,
        NewCategory {
            name: args.name,
            kind: args.kind,
            budget: args.budget,
        },
    )?;
    output::success(format!("category {} ({}) created", category.name, category.kind));
    Ok(())
}

fn category_list(session: &Session) -> CliResult<()> {
    let user_id = session.user_id()?;
    output::section("Categories");
    for category in session.store.get_categories(&user_id)? {
        let budget = category
            .budget
            .map(|limit| format!("budget {}", session.money(limit)))
            .unwrap_or_default();
        output::row(&category.name, format!("{:<8} {budget}", category.kind));
    }
    Ok(())
}

fn dashboard(session: &Session, args: DashboardArgs, now: DateTime<Utc>) -> CliResult<()> {
    let user_id = session.user_id()?;
    let filter = TransactionFilter::new(args.query, args.range);
    let view = session.store.dashboard(&user_id, &filter, now)?;

    output::section(format!("Dashboard ({})", filter.range));
    output::row("Income", session.money(view.totals.income));
    output::row("Expenses", session.money(view.totals.expenses));
    output::row("Balance", session.money(view.totals.balance));

    if !view.monthly_series.is_empty() {
        output::section("Monthly expenses");
        for month in &view.monthly_series {
            output::row(month.month, session.money(month.total));
        }
    }
    if !view.category_breakdown.is_empty() {
        output::section("By category");
        for slice in &view.category_breakdown {
            output::row(&slice.name, session.money(slice.value));
        }
    }
    if !view.budget_progress.is_empty() {
        output::section("Budgets");
        print_budget_rows(session, &view.budget_progress);
    }
    output::section("Recent transactions");
    if view.recent_transactions.is_empty() {
        output::info("no transactions");
    }
    for txn in &view.recent_transactions {
        output::row(
            format!("{}  {}", txn.date.format("%Y-%m-%d"), txn.description),
            format!("{} {}", txn.kind, session.money(txn.amount)),
        );
    }
    Ok(())
}

fn budget(session: &Session, now: DateTime<Utc>) -> CliResult<()> {
    let user_id = session.user_id()?;
    session.store.process_recurring(&user_id, now)?;
    let transactions = session.store.get_transactions(&user_id)?;
    let categories = session.store.get_categories(&user_id)?;
    let progress = aggregation::budget_progress(&transactions, &categories);
    output::section("Budgets");
    if progress.is_empty() {
        output::info("no category budgets set");
        return Ok(());
    }
    print_budget_rows(session, &progress);
    Ok(())
}

fn print_budget_rows(session: &Session, rows: &[aggregation::BudgetProgress]) {
    for row in rows {
        let line = format!(
            "{} / {} ({:.0}%)",
            session.money(row.spent),
            session.money(row.budget),
            row.percentage
        );
        if row.is_over_budget() {
            output::row(&row.category, output::render(output::MessageKind::Warning, line));
        } else {
            output::row(&row.category, line);
        }
    }
}

fn backup(session: &Session, command: Option<BackupCommand>) -> CliResult<()> {
    match command.unwrap_or(BackupCommand::Create { note: None }) {
        BackupCommand::Create { note } => {
            let name = session.store.backup(note.as_deref())?;
            output::success(format!("backup written: {name}"));
        }
        BackupCommand::List => {
            output::section("Backups");
            let backups = session.store.list_backups()?;
            if backups.is_empty() {
                output::info("no backups");
            }
            for name in backups {
                println!("  {name}");
            }
        }
        BackupCommand::Restore { name } => {
            session.store.restore_backup(&name)?;
            output::success(format!("restored {name}"));
        }
    }
    Ok(())
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
