//! Token command implementation

use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Password};

use crate::token_store;

#[derive(Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    command: TokenCommand,
}

#[derive(Subcommand)]
enum TokenCommand {
    /// Store a GitHub token for authenticated requests
    Set {
        /// The token; prompted for when omitted
        #[arg(value_name = "TOKEN")]
        token: Option<String>,
    },

    /// Show where the token is stored and whether one exists
    Show,

    /// Delete the stored token
    Clear,
}

pub fn run(args: TokenArgs) -> Result<()> {
    match args.command {
        TokenCommand::Set { token } => {
            let token = match token {
                Some(token) => token,
                None => Password::with_theme(&ColorfulTheme::default())
                    .with_prompt("GitHub token")
                    .interact()?,
            };
            if token.trim().is_empty() {
                anyhow::bail!("Refusing to store an empty token");
            }
            token_store::store_token(&token)?;
            println!("Token stored at {}", token_store::token_location()?.display());
        }
        TokenCommand::Show => {
            let location = token_store::token_location()?;
            match token_store::load_token() {
                Some(_) => println!("A token is stored at {}", location.display()),
                None => println!("No token stored (would live at {})", location.display()),
            }
        }
        TokenCommand::Clear => {
            token_store::clear_token()?;
            println!("Token cleared");
        }
    }
    Ok(())
}
