//! Command dispatch.

pub mod admin;
pub mod session_cmd;
pub mod staff;

use aula_core::{Facility, SessionState};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;
    match command {
        Command::Login(args) => session_cmd::login(&global, args).await,
        Command::Logout => session_cmd::logout(&global),
        Command::Whoami => session_cmd::whoami(&global),
        Command::Admin(args) => admin::run(&global, args.command).await,
        Command::Staff(args) => staff::run(&global, args.command).await,
    }
}

/// Fail fast when no session survives restore.
pub(crate) fn require_session(facility: &Facility) -> Result<(), CliError> {
    match facility.session().state() {
        SessionState::Authenticated => Ok(()),
        SessionState::Unauthenticated => Err(CliError::NotSignedIn),
    }
}

/// Admin commands additionally require the admin role locally; the
/// backend enforces the same rule with a 403.
pub(crate) fn require_admin(facility: &Facility) -> Result<(), CliError> {
    require_session(facility)?;
    let is_admin = facility
        .session()
        .current()
        .is_some_and(|cred| cred.identity.role.is_admin());
    if is_admin {
        Ok(())
    } else {
        Err(CliError::AuthRejected {
            message: "Admin access required".into(),
        })
    }
}
