use tiga_core::config::AppConfig;

use crate::auth::{clear_stored_session, load_stored_session, AuthService, OAuthProvider};
use crate::cli::{AuthCommands, OauthProviderArg};
use crate::error::CliError;

pub async fn run_auth(config: &AppConfig, command: AuthCommands) -> Result<(), CliError> {
    match command {
        AuthCommands::Login { email, password } => {
            let auth = AuthService::from_config(config)?;
            let session = auth
                .sign_in(&email, &password)
                .await
                .map_err(|error| CliError::Auth(error.to_string()))?;
            let email_label = session.user.email.as_deref().unwrap_or("(no email)");
            println!("Signed in as {email_label}");
            Ok(())
        }
        AuthCommands::Oauth { provider, redirect } => {
            let auth = AuthService::from_config(config)?;
            let provider = match provider {
                OauthProviderArg::Google => OAuthProvider::Google,
                OauthProviderArg::Github => OAuthProvider::Github,
            };
            println!("{}", auth.authorize_url(provider, &redirect));
            Ok(())
        }
        AuthCommands::Status => {
            let auth = AuthService::from_config(config)?;
            let session = auth
                .restore_session()
                .await
                .map_err(|error| CliError::Auth(error.to_string()))?;
            if let Some(session) = session {
                let email_label = session.user.email.as_deref().unwrap_or("(no email)");
                println!("Signed in as {email_label} (expires_at={})", session.expires_at);
            } else {
                println!("Not signed in.");
            }
            Ok(())
        }
        AuthCommands::Logout => {
            let stored = load_stored_session().map_err(|error| CliError::Auth(error.to_string()))?;
            if let Some(session) = stored {
                let auth = AuthService::from_config(config)?;
                auth.sign_out(&session.access_token)
                    .await
                    .map_err(|error| CliError::Auth(error.to_string()))?;
            } else {
                clear_stored_session().map_err(|error| CliError::Auth(error.to_string()))?;
            }
            println!("Signed out");
            Ok(())
        }
    }
}
