//! `login`, `logout`, `whoami`.

use dialoguer::Input;
use secrecy::SecretString;

use crate::build_facility;
use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;

pub async fn login(global: &GlobalOpts, args: LoginArgs) -> Result<(), CliError> {
    let facility = build_facility(global)?;

    let username = match args.username {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| CliError::Internal(e.to_string()))?,
    };
    let password = SecretString::from(rpassword::prompt_password("Password: ")?);

    let cred = if args.admin {
        facility.login_admin(&username, &password).await?
    } else {
        facility.login_staff(&username, &password).await?
    };

    if !global.quiet {
        println!(
            "Signed in as {} ({})",
            cred.identity.username, cred.identity.role
        );
    }
    Ok(())
}

pub fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let facility = build_facility(global)?;
    facility.logout();
    if !global.quiet {
        println!("Signed out.");
    }
    Ok(())
}

pub fn whoami(global: &GlobalOpts) -> Result<(), CliError> {
    let facility = build_facility(global)?;
    match facility.session().current() {
        Some(cred) => {
            println!("{} ({})", cred.identity.username, cred.identity.role);
            if !global.quiet {
                println!("Session expires: {}", cred.expires_at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            Ok(())
        }
        None => Err(CliError::NotSignedIn),
    }
}
