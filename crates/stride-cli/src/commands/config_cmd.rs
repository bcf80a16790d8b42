use stride_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::error::CliError;
use crate::profile::CliProfile;

pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_url,
            token,
            owner,
        } => init(api_url, token, owner),
        ConfigCommands::Show => show(),
    }
}

fn init(
    api_url: Option<String>,
    token: Option<String>,
    owner: Option<String>,
) -> Result<(), CliError> {
    let mut profile = CliProfile::load()?;

    if let Some(url) = normalize_text_option(api_url) {
        profile.api_base_url = Some(url);
    }
    if let Some(token) = normalize_text_option(token) {
        profile.auth_token = Some(token);
    }
    if let Some(owner) = normalize_text_option(owner) {
        profile.owner_id = Some(owner);
    }

    let path = profile.save()?;
    println!("Profile saved to {}", path.display());
    Ok(())
}

fn show() -> Result<(), CliError> {
    let profile = CliProfile::load()?;

    println!(
        "api_base_url: {}",
        profile.api_base_url.as_deref().unwrap_or("(unset)")
    );
    println!(
        "auth_token:   {}",
        if profile.auth_token.is_some() {
            "[REDACTED]"
        } else {
            "(unset)"
        }
    );
    println!(
        "owner_id:     {}",
        profile.owner_id.as_deref().unwrap_or("(unset)")
    );
    Ok(())
}
