use std::io;

use clap::{Args, Subcommand};
use shoptech_app::{
    context::AppContext,
    domain::{
        carts::{
            CartController, CartError,
            models::{AddOutcome, BuyItemOutcome, CheckoutOutcome},
        },
        catalog::CarId,
    },
};

use crate::render;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the active cart
    Show,

    /// Add a car to the active cart
    Add {
        /// Catalog id of the car
        car_id: CarId,
    },

    /// Buy a single car from the cart
    Buy {
        /// Catalog id of the car
        car_id: CarId,
    },

    /// Buy everything in the cart
    Checkout,

    /// Move the guest cart into your account cart
    Merge,
}

pub(crate) async fn run(command: CartCommand, context: &AppContext) -> Result<(), String> {
    let mut cart = context.cart_controller();

    match command.command {
        CartSubcommand::Show => show(&mut cart, context).await,
        CartSubcommand::Add { car_id } => add(&mut cart, car_id).await,
        CartSubcommand::Buy { car_id } => buy(&mut cart, car_id).await,
        CartSubcommand::Checkout => checkout(&mut cart).await,
        CartSubcommand::Merge => merge(&mut cart).await,
    }
}

async fn show(cart: &mut CartController, context: &AppContext) -> Result<(), String> {
    let view = cart.load_cart().await.map_err(failure("load cart"))?;

    if view.session_expired {
        println!("session expired, showing the guest cart; log in again for your account cart");
    }

    render::write_cart(io::stdout().lock(), &view, context.api.base_url())
        .map_err(|error| format!("failed to write output: {error}"))
}

async fn add(cart: &mut CartController, car: CarId) -> Result<(), String> {
    let outcome = cart.add_to_cart(car).await.map_err(failure("add car"))?;

    match outcome {
        AddOutcome::Added => println!("added car {car} to the guest cart"),
        AddOutcome::AlreadyInCart => println!("car {car} is already in the cart"),
        AddOutcome::AddedToAccount => println!("added car {car} to your cart"),
        AddOutcome::SavedToGuestCart => {
            println!("session expired, car {car} was saved to the guest cart; log in again");
        }
    }

    Ok(())
}

async fn buy(cart: &mut CartController, car: CarId) -> Result<(), String> {
    cart.load_cart().await.map_err(failure("load cart"))?;

    let outcome = cart.buy_item(car).await.map_err(failure("buy car"))?;

    match outcome {
        BuyItemOutcome::RemovedFromGuestCart { was_present: true } => {
            println!("removed car {car} from the guest cart; log in to purchase");
        }
        BuyItemOutcome::RemovedFromGuestCart { was_present: false } => {
            println!("car {car} is not in the cart");
        }
        BuyItemOutcome::Purchased => println!("purchased car {car}"),
    }

    Ok(())
}

async fn checkout(cart: &mut CartController) -> Result<(), String> {
    cart.load_cart().await.map_err(failure("load cart"))?;

    let outcome = cart.checkout().await.map_err(failure("check out"))?;

    match outcome {
        CheckoutOutcome::Cleared { had_items: true } => println!("guest cart cleared"),
        CheckoutOutcome::Cleared { had_items: false } => println!("cart is already empty"),
        CheckoutOutcome::Purchased(purchase) => println!(
            "purchased {} cars for {}",
            purchase.items_count,
            render::money(purchase.total_price)
        ),
    }

    Ok(())
}

async fn merge(cart: &mut CartController) -> Result<(), String> {
    let outcome = cart
        .merge_guest_cart()
        .await
        .map_err(failure("merge guest cart"))?;

    if outcome.merged == 0 {
        println!("guest cart is empty, nothing to merge");
    } else {
        println!("moved {} cars to your cart", outcome.merged);
    }

    Ok(())
}

fn failure(action: &'static str) -> impl Fn(CartError) -> String {
    move |error| format!("failed to {action}: {error}")
}
