use tiga_core::api::{ApiClient, RegisterUser};
use tiga_core::auth::SignUpOutcome;
use tiga_core::config::AppConfig;

use crate::auth::AuthService;
use crate::error::CliError;

/// Create the account on both backends: auth first, then the app service
/// record used for timeline attribution.
pub async fn run_register(
    config: &AppConfig,
    nickname: &str,
    email: &str,
    password: &str,
) -> Result<(), CliError> {
    let auth = AuthService::from_config(config)?;
    let outcome = auth
        .sign_up(email, password)
        .await
        .map_err(|error| CliError::Auth(error.to_string()))?;

    let api = ApiClient::new(&config.api_base_url()?)?;
    api.register(&RegisterUser {
        nickname: nickname.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
    .await?;

    match outcome {
        SignUpOutcome::SignedIn(session) => {
            let email_label = session.user.email.as_deref().unwrap_or("(no email)");
            println!("Registered and signed in as {email_label}");
        }
        SignUpOutcome::ConfirmationRequired => {
            println!("Registered. Check {email} for a confirmation link, then run `tiga auth login`.");
        }
    }
    Ok(())
}
