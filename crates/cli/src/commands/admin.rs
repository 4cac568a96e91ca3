use std::{io, path::PathBuf};

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use shoptech_app::{
    admin::{AdminConsole, CarImage, DriveType, NewCar},
    auth::Credentials,
    context::AppContext,
    domain::catalog::CarId,
};

use crate::render;

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// Log in as admin and keep the admin session
    Token(AdminLoginArgs),

    /// Forget the stored admin session
    Logout,

    /// Add a car to the catalog
    CreateCar(CreateCarArgs),

    /// Remove a car from the catalog
    DeleteCar {
        /// Catalog id
        car_id: CarId,
    },

    /// List registered users
    Users,

    /// Remove a user account
    DeleteUser {
        /// User id
        user_id: u64,
    },
}

#[derive(Debug, Args)]
struct AdminLoginArgs {
    /// Admin name
    #[arg(long)]
    name: String,

    /// Admin password
    #[arg(long, env = "SHOPTECH_ADMIN_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Args)]
struct CreateCarArgs {
    /// Manufacturer
    #[arg(long)]
    brand: String,

    /// Model name
    #[arg(long)]
    model: String,

    /// Engine power in horsepower
    #[arg(long)]
    power: u32,

    /// Engine displacement in litres
    #[arg(long)]
    displacement: Decimal,

    /// Driven wheels: front, rear or all
    #[arg(long)]
    drive: DriveType,

    /// Price in roubles
    #[arg(long)]
    price: Decimal,

    /// PNG or JPEG picture
    #[arg(long)]
    image: PathBuf,
}

impl CreateCarArgs {
    fn new_car(self) -> Result<NewCar, String> {
        let image = CarImage::read(&self.image)
            .map_err(|error| format!("{}: {error}", self.image.display()))?;

        Ok(NewCar {
            brand: self.brand,
            model: self.model,
            power: self.power,
            displacement: self.displacement,
            drive: self.drive,
            price: self.price,
            image,
        })
    }
}

pub(crate) async fn run(command: AdminCommand, context: &AppContext) -> Result<(), String> {
    let console = context.admin_console();

    match command.command {
        AdminSubcommand::Token(args) => login(args, &console).await,
        AdminSubcommand::Logout => logout(&console),
        AdminSubcommand::CreateCar(args) => create_car(args, &console).await,
        AdminSubcommand::DeleteCar { car_id } => delete_car(car_id, &console).await,
        AdminSubcommand::Users => users(&console).await,
        AdminSubcommand::DeleteUser { user_id } => delete_user(user_id, &console).await,
    }
}

async fn login(args: AdminLoginArgs, console: &AdminConsole) -> Result<(), String> {
    let credentials = Credentials::new(&args.name, args.password);

    console
        .log_in(&credentials)
        .await
        .map_err(|error| format!("failed to log in as admin: {error}"))?;

    println!("logged in as admin {}", credentials.name);

    Ok(())
}

fn logout(console: &AdminConsole) -> Result<(), String> {
    console
        .log_out()
        .map_err(|error| format!("failed to log out: {error}"))?;

    println!("admin logged out");

    Ok(())
}

async fn create_car(args: CreateCarArgs, console: &AdminConsole) -> Result<(), String> {
    let car = args
        .new_car()
        .map_err(|error| format!("failed to create car: {error}"))?;

    let created = console
        .create_car(&car)
        .await
        .map_err(|error| format!("failed to create car: {error}"))?;

    match created.id {
        Some(id) => println!("created car {id}: {} {}", created.brand, created.model),
        None => println!("created {} {}", created.brand, created.model),
    }

    Ok(())
}

async fn delete_car(car: CarId, console: &AdminConsole) -> Result<(), String> {
    console
        .delete_car(car)
        .await
        .map_err(|error| format!("failed to delete car {car}: {error}"))?;

    println!("deleted car {car}");

    Ok(())
}

async fn users(console: &AdminConsole) -> Result<(), String> {
    let users = console
        .users()
        .await
        .map_err(|error| format!("failed to list users: {error}"))?;

    if users.is_empty() {
        println!("no registered users");
        return Ok(());
    }

    render::write_users(io::stdout().lock(), &users)
        .map_err(|error| format!("failed to write output: {error}"))
}

async fn delete_user(user_id: u64, console: &AdminConsole) -> Result<(), String> {
    console
        .delete_user(user_id)
        .await
        .map_err(|error| format!("failed to delete user {user_id}: {error}"))?;

    println!("deleted user {user_id}");

    Ok(())
}
