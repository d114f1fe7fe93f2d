//! # Cafe Storefront Driver
//!
//! Runs the storefront pages headless against the configured backend (local
//! JSON files or a remote one over HTTP). Each stdin line is one user
//! gesture; pending backend calls are drained after every gesture.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  category <id>          tap a category tile                             │
//! │  item <id>              tap a menu item                                 │
//! │  plus <id> / minus <id> step a list item's counter                      │
//! │  add <id>               "add to cart" on a list item                    │
//! │  variant <id>           pick a variant on the details page              │
//! │  inc <item> <variant>   cart line +1                                    │
//! │  dec <item> <variant>   cart line -1                                    │
//! │  button                 click the main button                           │
//! │  checkout               cart page checkout button                       │
//! │  submit <cash|card> <name> <phone>                                      │
//! │  invoice <status>       close the invoice sheet (paid, failed, ...)     │
//! │  alert                  dismiss the alert                               │
//! │  go <route>             navigate directly                               │
//! │  show                   print the current state                         │
//! │  quit                                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{self, BufRead, Write};

use tracing::{info, warn};

use cafe_core::{CartItemKey, PayMethod};
use cafe_storefront::{
    backend, init_tracing, CheckoutInput, PageEvent, PageParams, RecordingPlatform, Storefront,
    StorefrontConfig, StorefrontResult,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> StorefrontResult<()> {
    init_tracing();

    let config = StorefrontConfig::load_or_default(None);
    info!(
        backend = ?config.api.backend,
        base_url = %config.api.base_url,
        data_dir = %config.api.data_dir.display(),
        "Starting cafe storefront"
    );

    let backend = backend::from_config(&config)?;
    let platform = RecordingPlatform::new("query_id=local&user=%7B%22id%22%3A1%7D");
    let mut storefront = Storefront::new(config, backend, Box::new(platform.clone()))?;

    storefront.start()?;
    storefront.run_until_idle().await?;
    print_state(&storefront, &platform);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        match apply(&mut storefront, &words) {
            Ok(Command::Quit) => break,
            Ok(Command::Show) => print_state(&storefront, &platform),
            Ok(Command::Done) => {
                storefront.run_until_idle().await?;
                print_state(&storefront, &platform);
            }
            Err(e) => warn!(command = %line, error = %e, "Command failed"),
        }

        if platform.snapshot().closed {
            info!("Webview closed");
            break;
        }
    }

    Ok(())
}

enum Command {
    Done,
    Show,
    Quit,
}

fn apply(storefront: &mut Storefront, words: &[&str]) -> StorefrontResult<Command> {
    let id = |index: usize| words.get(index).copied().unwrap_or_default().to_string();

    match words[0] {
        "category" => storefront.navigate("category", Some(PageParams::category(id(1))))?,
        "item" => {
            storefront.send(PageEvent::ItemSelected(id(1)))?;
        }
        "plus" => {
            storefront.send(PageEvent::StepperIncrement(id(1)))?;
        }
        "minus" => {
            storefront.send(PageEvent::StepperDecrement(id(1)))?;
        }
        "add" => {
            storefront.send(PageEvent::AddToCart(id(1)))?;
        }
        "variant" => {
            storefront.send(PageEvent::VariantSelected(id(1)))?;
        }
        "inc" => {
            storefront.send(PageEvent::CartIncrement(CartItemKey::new(id(1), id(2))))?;
        }
        "dec" => {
            storefront.send(PageEvent::CartDecrement(CartItemKey::new(id(1), id(2))))?;
        }
        "button" => {
            storefront.click_main_button()?;
        }
        "checkout" => {
            storefront.send(PageEvent::CheckoutRequested)?;
        }
        "submit" => {
            let pay_method = if id(1) == "card" {
                PayMethod::Card
            } else {
                PayMethod::Cash
            };
            storefront.send(PageEvent::SubmitOrder(CheckoutInput {
                name: id(2),
                phone: words.get(3..).map(|rest| rest.join(" ")).unwrap_or_default(),
                pay_method,
            }))?;
        }
        "invoice" => {
            storefront.invoice_closed(&id(1))?;
        }
        "alert" => {
            storefront.alert_dismissed()?;
        }
        "go" => storefront.navigate(&id(1), None)?,
        "show" => return Ok(Command::Show),
        "quit" | "exit" => return Ok(Command::Quit),
        other => {
            warn!(command = other, "Unknown command");
            return Ok(Command::Show);
        }
    }
    Ok(Command::Done)
}

fn print_state(storefront: &Storefront, platform: &RecordingPlatform) {
    let log = platform.snapshot();
    let screen = storefront.screen();
    let mut out = io::stdout().lock();

    let route = storefront
        .active_route()
        .map(|r| format!("{} ({}) #{}", r.name, r.view_path, r.generation))
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "route:       {}", route);
    let _ = writeln!(
        out,
        "cart:        {} portions, {}",
        storefront.cart().portion_count(),
        storefront.cart().display_total_cost()
    );
    if log.main_button.visible {
        let _ = writeln!(out, "main button: {}", log.main_button.label);
    }
    if let Some(snackbar) = screen.last_snackbar() {
        let _ = writeln!(out, "snackbar:    [{:?}] {}", snackbar.kind, snackbar.message);
    }
    if let Some(url) = log.invoices.last() {
        let _ = writeln!(out, "invoice:     {}", url);
    }
    if let Some(alert) = log.alerts.last() {
        let _ = writeln!(out, "alert:       {}", alert);
    }
}
