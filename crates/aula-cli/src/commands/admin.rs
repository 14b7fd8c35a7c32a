//! Admin dashboard commands: facility overview, classroom and device
//! management, user accounts, power control.

use dialoguer::Confirm;
use tracing::debug;

use aula_core::Facility;
use aula_core::model::{NewClassroom, NewDevice, NewUser};

use crate::cli::{
    AdminCommand, ClassroomsCommand, DevicesCommand, GlobalOpts, PowerState, UsersCommand,
};
use crate::commands::require_admin;
use crate::error::CliError;
use crate::output;

pub async fn run(global: &GlobalOpts, command: AdminCommand) -> Result<(), CliError> {
    let facility = crate::build_facility(global)?;
    require_admin(&facility)?;

    match command {
        AdminCommand::Dashboard { watch } => dashboard(&facility, watch).await,
        AdminCommand::Classrooms(args) => classrooms(&facility, args.command).await,
        AdminCommand::Devices(args) => devices(&facility, args.command).await,
        AdminCommand::Users(args) => users(&facility, global, args.command).await,
        AdminCommand::Power {
            classroom_id,
            state,
        } => power(&facility, global, classroom_id, state).await,
    }
}

// ── Dashboard ───────────────────────────────────────────────────────

async fn dashboard(facility: &Facility, watch: bool) -> Result<(), CliError> {
    if !watch {
        facility.refresh_admin().await?;
        render_dashboard(facility, false);
        return Ok(());
    }
    watch_loop(facility.clone(), WatchView::Admin).await
}

fn render_dashboard(facility: &Facility, clear: bool) {
    if clear {
        print!("\x1b[2J\x1b[1;1H");
    }
    let store = facility.store();
    println!("{}", output::render_summary(&store.summary()));
    if let Some(err) = store.last_error() {
        println!("(stale data: {err})");
    }
    println!();
    println!("{}", output::classroom_table(&store.classrooms()));
}

// ── Watch mode ──────────────────────────────────────────────────────

pub(crate) enum WatchView {
    Admin,
    AdminDevices,
    Staff,
}

/// Poll-and-redraw loop shared by every `--watch` flag. Runs until
/// Ctrl-C, or exits with `SessionExpired` when the poller hits a 401.
pub(crate) async fn watch_loop(facility: Facility, view: WatchView) -> Result<(), CliError> {
    let (expired_tx, mut expired_rx) = tokio::sync::oneshot::channel::<()>();
    let handle = match view {
        WatchView::Admin | WatchView::AdminDevices => facility.start_admin_polling(move || {
            let _ = expired_tx.send(());
        }),
        WatchView::Staff => facility.start_staff_polling(move || {
            let _ = expired_tx.send(());
        }),
    };

    let mut updates = facility.store().subscribe_summary();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("watch interrupted");
                break;
            }
            _ = &mut expired_rx => {
                handle.stop();
                return Err(CliError::SessionExpired);
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                match view {
                    WatchView::Admin => render_dashboard(&facility, true),
                    WatchView::AdminDevices => {
                        print!("\x1b[2J\x1b[1;1H");
                        println!("{}", output::device_table(&facility.store().devices()));
                    }
                    WatchView::Staff => {
                        print!("\x1b[2J\x1b[1;1H");
                        println!("{}", output::classroom_table(&facility.store().classrooms()));
                    }
                }
            }
        }
    }
    handle.stop();
    Ok(())
}

// ── Classrooms ──────────────────────────────────────────────────────

async fn classrooms(facility: &Facility, command: ClassroomsCommand) -> Result<(), CliError> {
    match command {
        ClassroomsCommand::List => {
            facility.refresh_admin().await?;
            println!("{}", output::classroom_table(&facility.store().classrooms()));
            Ok(())
        }
        ClassroomsCommand::Create {
            name,
            location,
            capacity,
            device,
        } => {
            let created = facility
                .create_classroom(&NewClassroom {
                    name,
                    location,
                    capacity,
                    esp_device_id: device,
                })
                .await?;
            println!("Created classroom {} (id {})", created.name, created.id);
            Ok(())
        }
    }
}

// ── Devices ─────────────────────────────────────────────────────────

async fn devices(facility: &Facility, command: DevicesCommand) -> Result<(), CliError> {
    match command {
        DevicesCommand::List => {
            let devices = facility.list_devices().await?;
            println!("{}", output::device_table(&devices));
            Ok(())
        }
        DevicesCommand::Status { watch } => {
            if !watch {
                facility.refresh_admin().await?;
                println!("{}", output::device_table(&facility.store().devices()));
                return Ok(());
            }
            watch_loop(facility.clone(), WatchView::AdminDevices).await
        }
        DevicesCommand::Register {
            device_id,
            name,
            mac,
            api_key,
        } => {
            let api_key =
                api_key.unwrap_or_else(|| format!("key_{}", uuid::Uuid::new_v4().simple()));
            let created = facility
                .create_device(&NewDevice {
                    device_id,
                    name,
                    api_key: api_key.clone(),
                    mac_address: mac,
                })
                .await?;
            println!("Registered device {}", created.device_id);
            println!("API key: {api_key}");
            println!("Store this key in the device firmware; it is not shown again.");
            Ok(())
        }
    }
}

// ── Users ───────────────────────────────────────────────────────────

async fn users(
    facility: &Facility,
    global: &GlobalOpts,
    command: UsersCommand,
) -> Result<(), CliError> {
    match command {
        UsersCommand::List => {
            let users = facility.list_users().await?;
            println!("{}", output::user_table(&users));
            Ok(())
        }
        UsersCommand::Create {
            username,
            email,
            role,
        } => {
            let password = rpassword::prompt_password("Password for new user: ")?;
            let created = facility
                .create_user(&NewUser {
                    username,
                    email,
                    password,
                    role,
                })
                .await?;
            println!("Created user {} (id {})", created.username, created.id);
            Ok(())
        }
        UsersCommand::Delete { id } => {
            if !global.yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete user {id}?"))
                    .default(false)
                    .interact()
                    .map_err(|e| CliError::Internal(e.to_string()))?;
                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }
            facility.delete_user(id).await?;
            println!("Deleted user {id}.");
            Ok(())
        }
    }
}

// ── Power ───────────────────────────────────────────────────────────

async fn power(
    facility: &Facility,
    global: &GlobalOpts,
    classroom_id: i64,
    state: PowerState,
) -> Result<(), CliError> {
    let power_on = matches!(state, PowerState::On);
    let ack = facility.set_power(classroom_id, power_on).await?;
    if !global.quiet {
        println!("{}", ack.message);
        println!("The dashboard reflects the change on the next status refresh.");
    }
    Ok(())
}
