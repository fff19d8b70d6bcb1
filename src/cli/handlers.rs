use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::config::{Config, ConfigManager};
use crate::core::errors::CliError;
use crate::core::services::{
    GenerationService, MovementService, ObligationService, SummaryService,
};
use crate::core::TenantManager;
use crate::ledger::{DateWindow, Frequency, MovementKind, RecurringObligation};
use crate::storage::JsonStorage;
use crate::utils::build_info;

use super::output::{self, money, Alignment, Table};
use super::{Cli, Commands, MovementCommands, ObligationCommands, TenantCommands};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MIN_ID_PREFIX: usize = 4;

/// Everything one invocation needs: configuration and the tenant manager.
pub struct CliContext {
    config_manager: ConfigManager,
    config: Config,
    manager: TenantManager,
    tenant: Option<String>,
    operator: Option<String>,
}

impl CliContext {
    pub fn from_env(tenant: Option<String>, operator: Option<String>) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let storage = JsonStorage::new(None, Some(config.backup_retention))?;
        Ok(Self {
            config_manager,
            config,
            manager: TenantManager::new(Box::new(storage)),
            tenant,
            operator,
        })
    }

    fn open_tenant(&mut self) -> Result<(), CliError> {
        let name = self
            .tenant
            .clone()
            .or_else(|| self.config.default_tenant.clone())
            .ok_or_else(|| {
                CliError::Input("no tenant selected; pass --tenant or create one with `tenant new`".into())
            })?;
        let metadata = self.manager.open(&name, self.operator.as_deref())?;
        for warning in metadata.warnings {
            output::print_warning(warning);
        }
        Ok(())
    }

    fn currency(&self) -> &str {
        &self.config.currency
    }
}

pub fn execute(cli: Cli) -> Result<(), CliError> {
    if let Commands::Version = cli.command {
        output::print_info(build_info::current().summary());
        return Ok(());
    }

    let mut ctx = CliContext::from_env(cli.tenant, cli.operator)?;
    crate::init_with(ctx.config.log_level.as_deref());

    match cli.command {
        Commands::Tenant { command } => match command {
            TenantCommands::New { name, default } => tenant_new(&mut ctx, &name, default),
            TenantCommands::List => tenant_list(&ctx),
        },
        Commands::Obligation { command } => {
            ctx.open_tenant()?;
            match command {
                ObligationCommands::Add {
                    description,
                    amount,
                    kind,
                    frequency,
                    billing_day,
                    start,
                    end,
                    category,
                } => {
                    let kind = MovementKind::parse(&kind)
                        .ok_or_else(|| CliError::Input(format!("unknown kind `{}`", kind)))?;
                    let mut obligation = RecurringObligation::new(
                        kind,
                        amount,
                        description,
                        Frequency::from_input(&frequency),
                        billing_day,
                        parse_date(&start)?,
                    );
                    if let Some(end) = end {
                        obligation = obligation.with_end_date(parse_date(&end)?);
                    }
                    if let Some(category) = category {
                        obligation = obligation.with_category(category);
                    }
                    obligation_add(&mut ctx, obligation)
                }
                ObligationCommands::List { as_of } => {
                    let reference = parse_date_or_today(as_of.as_deref())?;
                    obligation_list(&ctx, reference)
                }
                ObligationCommands::Activate { id } => obligation_set_active(&mut ctx, &id, true),
                ObligationCommands::Deactivate { id } => {
                    obligation_set_active(&mut ctx, &id, false)
                }
            }
        }
        Commands::Movement { command } => {
            ctx.open_tenant()?;
            match command {
                MovementCommands::List { from, to } => {
                    let window = match (from, to) {
                        (None, None) => None,
                        (from, to) => Some(window_from(from.as_deref(), to.as_deref())?),
                    };
                    movement_list(&ctx, window)
                }
                MovementCommands::Pay { id, on } => {
                    let paid_on = parse_date_or_today(on.as_deref())?;
                    movement_pay(&mut ctx, &id, paid_on)
                }
            }
        }
        Commands::Generate { through, dry_run } => {
            ctx.open_tenant()?;
            let cutoff = parse_date_or_today(through.as_deref())?;
            if dry_run {
                generate_preview(&ctx, cutoff)
            } else {
                generate(&mut ctx, cutoff)
            }
        }
        Commands::Summary { from, to } => {
            ctx.open_tenant()?;
            let window = window_from(from.as_deref(), to.as_deref())?;
            summary(&ctx, window)
        }
        Commands::Backup { note } => {
            ctx.open_tenant()?;
            let info = ctx.manager.backup(note.as_deref())?;
            output::print_success(format!("Backup written: {}", info.file_name));
            Ok(())
        }
        Commands::Version => Ok(()),
    }
}

fn tenant_new(ctx: &mut CliContext, name: &str, make_default: bool) -> Result<(), CliError> {
    ctx.manager.create(name, ctx.operator.as_deref())?;
    output::print_success(format!("Tenant `{}` created", name.trim()));
    if make_default || ctx.config.default_tenant.is_none() {
        ctx.config.default_tenant = Some(name.trim().to_string());
        ctx.config_manager.save(&ctx.config)?;
        output::print_info(format!("`{}` is now the default tenant", name.trim()));
    }
    Ok(())
}

fn tenant_list(ctx: &CliContext) -> Result<(), CliError> {
    let names = ctx.manager.list()?;
    if names.is_empty() {
        output::print_info("No tenants yet.");
        return Ok(());
    }
    for name in names {
        output::print_info(name);
    }
    Ok(())
}

fn obligation_add(ctx: &mut CliContext, obligation: RecurringObligation) -> Result<(), CliError> {
    let tenant = ctx.manager.current_mut()?;
    let id = ObligationService::add(tenant, obligation)?;
    ctx.manager.save()?;
    output::print_success(format!("Obligation {} added", short_id(id)));
    Ok(())
}

fn obligation_list(ctx: &CliContext, reference: NaiveDate) -> Result<(), CliError> {
    let tenant = ctx.manager.current()?;
    let mut table = Table::new(&[
        ("Id", Alignment::Left),
        ("Description", Alignment::Left),
        ("Kind", Alignment::Left),
        ("Amount", Alignment::Right),
        ("Frequency", Alignment::Left),
        ("Day", Alignment::Right),
        ("Next due", Alignment::Left),
        ("Active", Alignment::Left),
    ]);
    for (obligation, next) in ObligationService::list_with_next_due(tenant, reference) {
        table.push(vec![
            short_id(obligation.id),
            obligation.description.clone(),
            obligation.kind.label().to_string(),
            money(obligation.amount, ctx.currency()),
            obligation.frequency.to_string(),
            obligation.billing_day().to_string(),
            next.map(|date| date.to_string()).unwrap_or_else(|| "-".into()),
            if obligation.active { "yes" } else { "no" }.to_string(),
        ]);
    }
    print_table("Recurring obligations", &table);
    Ok(())
}

fn obligation_set_active(ctx: &mut CliContext, raw_id: &str, active: bool) -> Result<(), CliError> {
    let tenant = ctx.manager.current_mut()?;
    let id = resolve_id(tenant.obligations.iter().map(|o| o.id), raw_id)?;
    ObligationService::set_active(tenant, id, active)?;
    ctx.manager.save()?;
    let state = if active { "activated" } else { "deactivated" };
    output::print_success(format!("Obligation {} {}", short_id(id), state));
    Ok(())
}

fn movement_list(ctx: &CliContext, window: Option<DateWindow>) -> Result<(), CliError> {
    let tenant = ctx.manager.current()?;
    let movements = match window {
        Some(window) => MovementService::list_in_window(tenant, window),
        None => MovementService::list(tenant),
    };
    let mut table = Table::new(&[
        ("Id", Alignment::Left),
        ("Date", Alignment::Left),
        ("Description", Alignment::Left),
        ("Amount", Alignment::Right),
        ("Status", Alignment::Left),
    ]);
    for movement in movements {
        let status = match movement.paid_on {
            Some(paid_on) => format!("paid {}", paid_on),
            None => "pending".into(),
        };
        table.push(vec![
            short_id(movement.id),
            movement.date.to_string(),
            movement.description.clone(),
            money(movement.signed_amount(), ctx.currency()),
            status,
        ]);
    }
    print_table("Movements", &table);
    Ok(())
}

fn movement_pay(ctx: &mut CliContext, raw_id: &str, paid_on: NaiveDate) -> Result<(), CliError> {
    let tenant = ctx.manager.current_mut()?;
    let id = resolve_id(tenant.movements.iter().map(|m| m.id), raw_id)?;
    MovementService::mark_paid(tenant, id, paid_on)?;
    ctx.manager.save()?;
    output::print_success(format!("Movement {} paid on {}", short_id(id), paid_on));
    Ok(())
}

fn generate_preview(ctx: &CliContext, cutoff: NaiveDate) -> Result<(), CliError> {
    let tenant = ctx.manager.current()?;
    let pending = GenerationService::preview(tenant, cutoff)?;
    let mut table = Table::new(&[
        ("Due", Alignment::Left),
        ("Description", Alignment::Left),
        ("Amount", Alignment::Right),
    ]);
    for item in &pending {
        table.push(vec![
            item.due_date.to_string(),
            item.description.clone(),
            money(item.kind.sign() * item.amount, ctx.currency()),
        ]);
    }
    print_table(&format!("Pending through {}", cutoff), &table);
    output::print_info(format!("{} movement(s) would be created", pending.len()));
    Ok(())
}

fn generate(ctx: &mut CliContext, cutoff: NaiveDate) -> Result<(), CliError> {
    let report = ctx.manager.generate_pending(cutoff)?;
    for warning in &report.warnings {
        output::print_warning(warning);
    }
    output::print_success(format!(
        "Created {} movement(s) through {}, skipped {}",
        report.created, cutoff, report.skipped
    ));
    Ok(())
}

fn summary(ctx: &CliContext, window: DateWindow) -> Result<(), CliError> {
    let tenant = ctx.manager.current()?;
    let summary = SummaryService::summarize(tenant, window);
    let currency = ctx.currency();
    output::print_header(format!("{} to {}", window.start, window.end));
    output::print_info(format!("Income:   {}", money(summary.income, currency)));
    output::print_info(format!("Expense:  {}", money(summary.expense, currency)));
    output::print_info(format!("Net:      {}", money(summary.net, currency)));
    output::print_info(format!("Paid:     {}", money(summary.paid_total, currency)));
    output::print_info(format!("Pending:  {}", money(summary.pending_total, currency)));

    let mut table = Table::new(&[
        ("Category", Alignment::Left),
        ("Income", Alignment::Right),
        ("Expense", Alignment::Right),
    ]);
    for total in &summary.per_category {
        table.push(vec![
            total.category.clone(),
            money(total.income, currency),
            money(total.expense, currency),
        ]);
    }
    print_table("By category", &table);
    Ok(())
}

fn print_table(title: &str, table: &Table) {
    output::print_header(title);
    if table.is_empty() {
        output::print_info("(none)");
    } else {
        output::print_info(table.render());
    }
}

fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// Matches a full id or a unique prefix of its simple (dash-free) form.
fn resolve_id(candidates: impl Iterator<Item = Uuid>, raw: &str) -> Result<Uuid, CliError> {
    if let Ok(id) = Uuid::parse_str(raw) {
        return Ok(id);
    }
    let prefix = raw.trim().to_ascii_lowercase().replace('-', "");
    if prefix.len() < MIN_ID_PREFIX {
        return Err(CliError::Input(format!(
            "id prefix `{}` is too short (at least {} characters)",
            raw, MIN_ID_PREFIX
        )));
    }
    let matches: Vec<Uuid> = candidates
        .filter(|id| id.simple().to_string().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CliError::Input(format!("no record matches `{}`", raw))),
        _ => Err(CliError::Input(format!("`{}` matches several records", raw))),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| CliError::Input(format!("invalid date `{}`, expected YYYY-MM-DD", raw)))
}

fn parse_date_or_today(raw: Option<&str>) -> Result<NaiveDate, CliError> {
    match raw {
        Some(raw) => parse_date(raw),
        None => Ok(Local::now().date_naive()),
    }
}

/// Missing bounds default to the current month.
fn window_from(from: Option<&str>, to: Option<&str>) -> Result<DateWindow, CliError> {
    let month = DateWindow::month_of(Local::now().date_naive())
        .ok_or_else(|| CliError::Input("cannot determine the current month".into()))?;
    let start = match from {
        Some(raw) => parse_date(raw)?,
        None => month.start,
    };
    let end = match to {
        Some(raw) => parse_date(raw)?,
        None => month.end,
    };
    Ok(DateWindow::new(start, end)?)
}
