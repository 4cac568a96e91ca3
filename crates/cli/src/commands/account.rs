use clap::{Args, Subcommand};
use shoptech_app::{
    auth::{Credentials, log_in, register_account},
    context::AppContext,
};

#[derive(Debug, Args)]
pub(crate) struct AccountCommand {
    #[command(subcommand)]
    command: AccountSubcommand,
}

#[derive(Debug, Subcommand)]
enum AccountSubcommand {
    /// Create an account
    Register(CredentialsArgs),

    /// Log in and keep the session
    Login(CredentialsArgs),

    /// Forget the stored session
    Logout,
}

#[derive(Debug, Args)]
struct CredentialsArgs {
    /// Account name
    #[arg(long)]
    name: String,

    /// Account password
    #[arg(long, env = "SHOPTECH_PASSWORD", hide_env_values = true)]
    password: String,
}

impl CredentialsArgs {
    fn credentials(self) -> Credentials {
        Credentials::new(&self.name, self.password)
    }
}

pub(crate) async fn run(command: AccountCommand, context: &AppContext) -> Result<(), String> {
    match command.command {
        AccountSubcommand::Register(args) => register(args, context).await,
        AccountSubcommand::Login(args) => login(args, context).await,
        AccountSubcommand::Logout => logout(context),
    }
}

async fn register(args: CredentialsArgs, context: &AppContext) -> Result<(), String> {
    let credentials = args.credentials();

    register_account(context.accounts.as_ref(), &credentials)
        .await
        .map_err(|error| format!("failed to register: {error}"))?;

    println!("registered {}; log in to use your account cart", credentials.name);

    Ok(())
}

async fn login(args: CredentialsArgs, context: &AppContext) -> Result<(), String> {
    let credentials = args.credentials();

    log_in(context.accounts.as_ref(), &context.session(), &credentials)
        .await
        .map_err(|error| format!("failed to log in: {error}"))?;

    println!("logged in as {}", credentials.name);

    let waiting = context.cart_controller().guest_cart().ids().len();

    if waiting > 0 {
        println!("guest cart holds {waiting} cars; run `shoptech cart merge` to move them");
    }

    Ok(())
}

fn logout(context: &AppContext) -> Result<(), String> {
    context
        .session()
        .sign_out()
        .map_err(|error| format!("failed to log out: {error}"))?;

    println!("logged out");

    Ok(())
}
