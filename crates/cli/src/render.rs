//! Terminal rendering of cart effects.
//!
//! The terminal plays the part of the page: toasts are printed lines, the
//! badge is a status line, and reload/navigate delays are slept through
//! before printing the transition.

#![allow(clippy::print_stdout)]

use std::io::{BufRead, Write};
use std::time::Instant;

use campus_market_client::{Confirm, Delivery, Effect, Severity, Toast, Toaster, UiTiming};
use campus_market_core::Cart;

/// Applies effects to the terminal.
#[derive(Debug)]
pub struct Renderer {
    toaster: Toaster,
}

impl Renderer {
    /// Create a renderer whose overlay (the terminal) already exists.
    #[must_use]
    pub fn new(timing: &UiTiming) -> Self {
        let mut toaster = Toaster::new(timing.toast_duration);
        toaster.ensure_overlay();
        Self { toaster }
    }

    /// Apply effects in order.
    pub async fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Toast(toast) => self.toast(toast),
                Effect::Badge(text) if text.is_empty() => println!("cart: empty"),
                Effect::Badge(text) => println!("cart: {text} item(s)"),
                Effect::Stepper(value) => println!("quantity: {value}"),
                Effect::Reload { after } => {
                    tokio::time::sleep(after).await;
                    self.toaster.tick(Instant::now());
                    println!("(page reloaded)");
                }
                Effect::Navigate { to, after } => {
                    tokio::time::sleep(after).await;
                    self.toaster.tick(Instant::now());
                    println!("(navigated to {to})");
                }
            }
        }
    }

    fn toast(&mut self, toast: Toast) {
        let now = Instant::now();
        self.toaster.tick(now);
        let label = severity_label(toast.severity);
        let message = toast.message.clone();
        match self.toaster.show(toast, now) {
            Delivery::Shown(_) => println!("[{label}] {message}"),
            Delivery::Alert(text) => println!("!! {text}"),
        }
    }

    /// Print the cart as a table.
    pub fn print_cart(&self, cart: &Cart) {
        if cart.is_empty() {
            println!("Your cart is empty");
            return;
        }

        println!("{:<10} {:<24} {:>10} {:>5} {:>12}", "ID", "ITEM", "PRICE", "QTY", "TOTAL");
        for line in cart.lines() {
            println!(
                "{:<10} {:<24} {:>10} {:>5} {:>12}",
                line.id,
                line.name,
                line.price.display(),
                line.qty,
                line.line_total().display()
            );
        }
        println!("{:>65}", format!("subtotal {}", cart.subtotal().display()));
    }
}

const fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Success => "ok",
        Severity::Warning => "warn",
        Severity::Error => "error",
    }
}

/// Asks for confirmation on stdin unless `--yes` was given.
#[derive(Debug, Clone, Copy)]
pub struct StdinConfirm {
    pub assume_yes: bool,
}

impl Confirm for StdinConfirm {
    async fn ask(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            print!("{prompt} [y/N] ");
            let _ = std::io::stdout().flush();
            let mut answer = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut answer)
                .map(|_| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
                .unwrap_or(false)
        })
        .await
        .unwrap_or(false)
    }
}
